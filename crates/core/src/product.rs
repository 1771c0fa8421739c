//! Product field names, creation defaults, identifier parsing and input
//! coercion helpers.

use bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::ProductId;

/// Entity label used in error messages.
pub const ENTITY: &str = "Product";

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_OBJECT_ID: &str = "_id";
pub const FIELD_PRODUCT_ID: &str = "product_id";
pub const FIELD_PRODUCT_CODE: &str = "product_code";
pub const FIELD_PRODUCT_NAME: &str = "product_name";
pub const FIELD_CATEGORY_NAME: &str = "category_name";
pub const FIELD_BRAND_NAME: &str = "brand_name";
pub const FIELD_BRAND_LOGO: &str = "brand_logo";
pub const FIELD_PRICE_CASH: &str = "price_cash";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_LINK: &str = "link";
pub const FIELD_SHOW_IN_APP: &str = "show_in_app";
pub const FIELD_NEW_PRODUCT: &str = "new_product";
pub const FIELD_DISCOUNT: &str = "discount";
pub const FIELD_IS_SPARE_PART: &str = "is_spare_part";
pub const FIELD_MAIN_BOOST: &str = "main_boost";
pub const FIELD_LOW_VALUE_FLAG: &str = "low_value_flag";
pub const FIELD_POPULARITY: &str = "popularity";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// Fields returned by the list endpoint (`_id` is always included).
pub const LIST_FIELDS: &[&str] = &[
    FIELD_PRODUCT_ID,
    FIELD_PRODUCT_CODE,
    FIELD_PRODUCT_NAME,
    FIELD_CATEGORY_NAME,
    FIELD_BRAND_NAME,
    FIELD_PRICE_CASH,
    FIELD_LINK,
    FIELD_SHOW_IN_APP,
];

// ---------------------------------------------------------------------------
// Creation defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_PRICE_CASH: f64 = 0.0;
pub const DEFAULT_SHOW_IN_APP: bool = true;
pub const DEFAULT_NEW_PRODUCT: bool = false;
pub const DEFAULT_IS_SPARE_PART: bool = false;
pub const DEFAULT_MAIN_BOOST: f64 = 1.0;
pub const DEFAULT_LOW_VALUE_FLAG: f64 = 0.0;
pub const DEFAULT_POPULARITY: f64 = 0.0;

/// Maximum length of any free-text product field.
pub const MAX_TEXT_LEN: u64 = 10_000;

/// Maximum number of entries in `link`.
pub const MAX_LINKS: u64 = 100;

// ---------------------------------------------------------------------------
// Identifier parsing
// ---------------------------------------------------------------------------

/// A parsed product path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRef {
    /// Lookup by `product_id`.
    Sequence(ProductId),
    /// Lookup by the store's `_id`.
    Object(ObjectId),
}

impl ProductRef {
    /// Parse a path parameter.
    ///
    /// Integers win over object IDs: `"42"` always means `product_id = 42`.
    /// A digit string too long for an `i64` can only be an object ID, so it
    /// is tried as one.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();

        if let Ok(id) = trimmed.parse::<ProductId>() {
            return Ok(Self::Sequence(id));
        }

        ObjectId::parse_str(trimmed)
            .map(Self::Object)
            .map_err(|_| CoreError::InvalidIdentifier {
                entity: ENTITY,
                raw: raw.to_string(),
            })
    }
}

impl std::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence(id) => write!(f, "{id}"),
            Self::Object(oid) => write!(f, "{oid}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input coercion
// ---------------------------------------------------------------------------

/// A numeric input that is neither a finite number nor a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("not a finite number")]
pub struct InvalidNumber;

/// A numeric field as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Coerce to `f64`.
    ///
    /// A blank string yields `Ok(None)` (the field counts as not given).
    /// Non-finite values are rejected.
    pub fn coerce(&self) -> Result<Option<f64>, InvalidNumber> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) if s.trim().is_empty() => return Ok(None),
            Self::Text(s) => s.trim().parse::<f64>().map_err(|_| InvalidNumber)?,
        };

        if value.is_finite() {
            Ok(Some(value))
        } else {
            Err(InvalidNumber)
        }
    }
}

/// Coerce an optional numeric input, mapping failure to a validation error
/// with the given message.
pub fn coerce_number(
    input: Option<&NumericInput>,
    message: &str,
) -> Result<Option<f64>, CoreError> {
    match input {
        None => Ok(None),
        Some(n) => n
            .coerce()
            .map_err(|_| CoreError::Validation(message.to_string())),
    }
}

/// Whether a required text value counts as missing.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Check required fields in order and report the first missing one.
pub fn check_required<'a>(
    fields: impl IntoIterator<Item = (&'static str, Option<&'a str>)>,
) -> Result<(), CoreError> {
    for (name, value) in fields {
        if is_blank(value) {
            return Err(CoreError::Validation(format!(
                "Missing required field: {name}"
            )));
        }
    }
    Ok(())
}
