#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid {entity} ID format: {raw}")]
    InvalidIdentifier { entity: &'static str, raw: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
