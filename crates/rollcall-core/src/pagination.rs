//! Page-based pagination for list endpoints.
//!
//! Pages are 1-indexed. `limit` defaults to [`DEFAULT_PAGE_SIZE`] and is
//! clamped to [1, [`MAX_PAGE_SIZE`]].

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Metadata for a page of a listing that holds `total` items overall.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let page = self.page();

        PaginationMeta {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
            has_more: self.offset() + limit < total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    /// Items across all pages
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_and_page_are_clamped() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(1_000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = PaginationParams {
            page: Some(-3),
            limit: Some(0),
        };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_from_page() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_meta_for_middle_and_last_page() {
        let params = PaginationParams {
            page: Some(2),
            limit: Some(10),
        };
        let meta = params.meta(25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_more);

        let last = PaginationParams {
            page: Some(3),
            limit: Some(10),
        };
        assert!(!last.meta(25).has_more);
    }

    #[test]
    fn test_meta_for_empty_listing() {
        let meta = PaginationParams::default().meta(0);
        assert_eq!(meta.total, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_empty_query_values_fall_back_to_defaults() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page":"","limit":"5"}"#).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 5);
    }
}
