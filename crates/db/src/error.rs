use bson::oid::ObjectId;

/// Failure of a persistence operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Error reported by the MongoDB driver.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// A value could not be encoded as BSON.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    /// A stored document has no ObjectId `_id`.
    #[error("Document has no ObjectId")]
    MissingObjectId,

    /// A document written a moment ago could not be read back.
    #[error("Document {0} not found after write")]
    Vanished(ObjectId),

    /// The sequence counter returned no usable value.
    #[error("Sequence counter returned no value")]
    CounterUnavailable,
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
