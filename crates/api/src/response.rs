//! Shared response envelope types for API handlers.
//!
//! Every response carries `success`. Successful responses add `data`
//! and/or `message`; listings add the page bookkeeping; failures carry
//! `error` (see [`ErrorResponse`], produced by `AppError`).

use serde::Serialize;

/// `{ "success": true, "data": T, "message"?: ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message),
        }
    }
}

/// A page of a listing.
///
/// `count` is the number of items in `data`; `total` counts every match.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
    pub total: u64,
    pub limit: i64,
    pub skip: i64,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>, total: u64, limit: i64, skip: i64) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
            total,
            limit,
            skip,
        }
    }
}

/// `{ "success": true, "message": ... }` with no payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// `{ "success": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
