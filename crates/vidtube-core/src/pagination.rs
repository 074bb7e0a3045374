//! Page-based pagination for list endpoints.
//!
//! Query parameters `page` (1-indexed, default 1) and `limit` (1-100,
//! default 10). Empty query values are treated as absent. A page below 1, or
//! one whose offset overflows, is rejected rather than clamped.

use anyhow::anyhow;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 1
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[param(minimum = 1, example = 1)]
    pub page: Option<i64>,
    /// Items per page (1-100)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> Result<i64, AppError> {
        match self.page {
            None => Ok(1),
            Some(page) if page >= 1 => Ok(page),
            Some(page) => Err(AppError::bad_request(anyhow!(
                "page must be at least 1, got {page}"
            ))),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> Result<i64, AppError> {
        (self.page()? - 1)
            .checked_mul(self.limit())
            .ok_or_else(|| AppError::bad_request(anyhow!("page is out of range")))
    }

    pub fn meta(&self, total: i64) -> Result<PageMeta, AppError> {
        let page = self.page()?;
        let limit = self.limit();
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Ok(PageMeta {
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams { page, limit }
    }

    #[test]
    fn test_defaults() {
        let p = params(None, None);
        assert_eq!(p.page().unwrap(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset().unwrap(), 0);
    }

    #[test]
    fn test_page_below_one_is_rejected() {
        assert!(params(Some(0), None).page().is_err());
        assert!(params(Some(-3), None).offset().is_err());
    }

    #[test]
    fn test_huge_page_is_rejected() {
        let err = params(Some(i64::MAX), Some(100)).offset().unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::BadRequest);
        assert!(params(Some(i64::MAX), Some(1)).offset().is_ok());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(None, Some(500)).limit(), MAX_LIMIT);
        assert_eq!(params(None, Some(0)).limit(), 1);
    }

    #[test]
    fn test_offset_for_later_pages() {
        assert_eq!(params(Some(3), Some(20)).offset().unwrap(), 40);
    }

    #[test]
    fn test_meta() {
        let meta = params(Some(2), Some(10)).meta(25).unwrap();
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);

        let last = params(Some(3), Some(10)).meta(25).unwrap();
        assert!(!last.has_next_page);

        let empty = params(None, None).meta(0).unwrap();
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }

    #[test]
    fn test_empty_query_values_are_absent() {
        let p: PageParams = serde_json::from_str(r#"{"page":"","limit":"5"}"#).unwrap();
        assert_eq!(p.page, None);
        assert_eq!(p.limit, Some(5));
    }
}
