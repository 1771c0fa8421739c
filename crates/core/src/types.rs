/// Externally visible sequence ID of a product (`product_id`).
pub type ProductId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
