//! Listing and search helpers for the product list endpoint.

use crate::types::ProductId;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for `GET /products`.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Hard cap on the page size for `GET /products`.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided skip to non-negative.
pub fn clamp_skip(skip: Option<i64>) -> i64 {
    skip.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Search terms
// ---------------------------------------------------------------------------

/// Normalize a raw `search` parameter. Blank input means "no search".
pub fn normalize_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Interpret an all-digit search term as an exact `product_id` match.
///
/// Returns `None` for anything with a non-digit character (signs included)
/// or for values that overflow.
pub fn numeric_term(term: &str) -> Option<ProductId> {
    if term.is_empty() || !term.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    term.parse().ok()
}

// ---------------------------------------------------------------------------
// Visibility filter
// ---------------------------------------------------------------------------

/// Which products a listing includes, based on `show_in_app`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// No filter.
    #[default]
    Any,
    /// Only products not soft-deleted.
    Visible,
    /// Only soft-deleted products.
    Hidden,
}

impl Visibility {
    /// Parse the `show_in_app` query parameter. Unknown values impose no filter.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("true") => Self::Visible,
            Some("false") => Self::Hidden,
            _ => Self::Any,
        }
    }

    /// Whether a product with the given stored flag passes this filter.
    ///
    /// A missing flag counts as visible.
    pub fn admits(self, show_in_app: Option<bool>) -> bool {
        let visible = show_in_app != Some(false);
        match self {
            Self::Any => true,
            Self::Visible => visible,
            Self::Hidden => !visible,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
