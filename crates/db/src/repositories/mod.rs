//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&dyn ProductStore` as the first argument.

pub mod product_repo;

pub use product_repo::{DeleteOutcome, ProductPage, ProductRepo, UpdateOutcome};
