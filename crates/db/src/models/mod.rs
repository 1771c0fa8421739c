//! Request DTOs and write models.
//!
//! Incoming JSON bodies deserialize into the DTOs here. Each DTO has an
//! explicit validation pass (`into_draft` / `into_patch`) that produces a
//! typed value for the repository.

pub mod product;

use validator::ValidationErrors;

/// Render field-level validation errors as one message.
///
/// Fields are sorted so the message is stable: `"Invalid fields:
/// description (length), link (length)"`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
            format!("{field} ({})", codes.join(", "))
        })
        .collect();
    fields.sort();
    format!("Invalid fields: {}", fields.join(", "))
}
