//! Product catalog domain layer.
//!
//! Pure logic shared by the persistence and HTTP crates: error taxonomy,
//! identifier parsing, numeric coercion, listing helpers and the conversion
//! of stored documents into JSON-safe values. Nothing here performs I/O.

pub mod error;
pub mod product;
pub mod search;
pub mod serialize;
pub mod types;
