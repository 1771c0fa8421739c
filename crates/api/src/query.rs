//! Query parameter types for API handlers.

use catalog_core::search::{
    clamp_limit, clamp_skip, normalize_term, Visibility, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use catalog_db::store::{Page, ProductFilter};

/// Query parameters for `GET /products`.
///
/// Kept as raw strings so that malformed values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ListProductsParams {
    pub search: Option<String>,
    pub show_in_app: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl ListProductsParams {
    /// Collect the known keys from decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "show_in_app" => &mut params.show_in_app,
                "limit" => &mut params.limit,
                "skip" => &mut params.skip,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            search: normalize_term(self.search.as_deref()),
            visibility: Visibility::from_param(self.show_in_app.as_deref()),
        }
    }

    /// Page bounds, clamped to `[1, 100]` for the limit and `>= 0` for skip.
    pub fn page(&self) -> Page {
        Page {
            limit: clamp_limit(lenient_int(&self.limit), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
            skip: clamp_skip(lenient_int(&self.skip)),
        }
    }
}

fn lenient_int(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, skip: Option<&str>) -> ListProductsParams {
        ListProductsParams {
            limit: limit.map(str::to_string),
            skip: skip.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn page_defaults() {
        assert_eq!(params(None, None).page(), Page { limit: 100, skip: 0 });
    }

    #[test]
    fn page_clamps_and_ignores_garbage() {
        assert_eq!(params(Some("500"), Some("-3")).page(), Page { limit: 100, skip: 0 });
        assert_eq!(params(Some("0"), Some("10")).page(), Page { limit: 1, skip: 10 });
        assert_eq!(params(Some("ten"), Some("x")).page(), Page { limit: 100, skip: 0 });
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let p = ListProductsParams::from_pairs(pairs(&[
            ("limit", "5"),
            ("limit", "10"),
            ("skip", "2"),
            ("colour", "red"),
            ("skip", "9"),
        ]));
        assert_eq!(p.page(), Page { limit: 5, skip: 2 });
        assert!(p.search.is_none());
    }

    #[test]
    fn filter_normalizes_search() {
        let p = ListProductsParams {
            search: Some("  drill ".to_string()),
            show_in_app: Some("true".to_string()),
            ..Default::default()
        };
        let filter = p.filter();
        assert_eq!(filter.search.as_deref(), Some("drill"));
        assert_eq!(filter.visibility, Visibility::Visible);

        let blank = ListProductsParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.filter(), ProductFilter::default());
    }
}
