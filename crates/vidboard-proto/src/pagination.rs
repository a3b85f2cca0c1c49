//! Page slicing over the catalog and the wire shape of `GET /api/data`.

use serde::{Deserialize, Serialize};

/// Default page size, shared by the server defaults and the dashboard.
pub const PAGE_SIZE: u32 = 10;
pub const DEFAULT_PAGE: u32 = 1;

/// Error marker returned alongside the zeroed page when the catalog can't be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationInfo {
    /// Derive the metadata purely from `total`, `page` and `limit`.
    pub fn new(total: usize, page: u32, limit: u32) -> Self {
        let per_page = limit as usize;
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let end = (page as usize).saturating_mul(per_page);
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: per_page > 0 && end < total,
            has_prev_page: page > 1,
        }
    }

    /// The block reported when the catalog couldn't be read.
    pub fn unavailable() -> Self {
        Self {
            total: 0,
            page: DEFAULT_PAGE,
            limit: PAGE_SIZE,
            total_pages: 1,
            has_next_page: false,
            has_prev_page: false,
        }
    }
}

/// One page of results, as served by `GET /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Page<T> {
    /// Empty items, zeroed pagination and an error marker.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::unavailable(),
            error: Some(message.into()),
        }
    }
}

/// Slice `all[(page-1)*limit .. page*limit]`, clipped to bounds.
///
/// `page` is 1-based.  `page == 0` or `limit == 0` yield an empty slice.
pub fn paginate<T: Clone>(all: &[T], page: u32, limit: u32) -> Page<T> {
    let per_page = limit as usize;
    let items = if page == 0 || per_page == 0 {
        Vec::new()
    } else {
        let start = ((page - 1) as usize).saturating_mul(per_page).min(all.len());
        let end = start.saturating_add(per_page).min(all.len());
        all[start..end].to_vec()
    };

    Page {
        items,
        pagination: PaginationInfo::new(all.len(), page, limit),
        error: None,
    }
}

/// Query parameters as the endpoint receives them, already defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Parse raw `page`/`limit` strings.  Absent, unparsable or non-positive
    /// values fall back to the defaults instead of propagating.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(PAGE_SIZE),
        }
    }
}

/// Leading-integer parse: `"3"` and `"3abc"` are 3, `"3.9"` is 3, `"abc"`,
/// `"-2"` and `"0"` are `None`.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits: &str = {
        let end = raw
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        &raw[..end]
    };
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_25() {
        let all: Vec<u32> = (0..25).collect();
        let page = paginate(&all, 1, 10);
        assert_eq!(page.items, (0..10).collect::<Vec<_>>());
        assert_eq!(
            page.pagination,
            PaginationInfo {
                total: 25,
                page: 1,
                limit: 10,
                total_pages: 3,
                has_next_page: true,
                has_prev_page: false,
            }
        );
    }

    #[test]
    fn test_last_partial_page() {
        let all: Vec<u32> = (0..25).collect();
        let page = paginate(&all, 3, 10);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let all: Vec<u32> = (0..25).collect();
        let page = paginate(&all, 7, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let all: Vec<u32> = (0..5).collect();
        assert!(paginate(&all, 0, 10).items.is_empty());
        let zero_limit = paginate(&all, 1, 0);
        assert!(zero_limit.items.is_empty());
        assert_eq!(zero_limit.pagination.total_pages, 0);
        assert!(!zero_limit.pagination.has_next_page);
        assert!(paginate(&all, u32::MAX, u32::MAX).items.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let all: Vec<u32> = Vec::new();
        let page = paginate(&all, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let page = paginate(&[1u32, 2, 3], 1, 2);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["totalPages"], 2);
        assert_eq!(json["pagination"]["hasNextPage"], true);
        assert_eq!(json["pagination"]["hasPrevPage"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failed_page_shape() {
        let page: Page<u32> = Page::failed(LOAD_FAILED_MESSAGE);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [],
                "pagination": {
                    "total": 0,
                    "page": 1,
                    "limit": 10,
                    "totalPages": 1,
                    "hasNextPage": false,
                    "hasPrevPage": false
                },
                "error": "Failed to load data"
            })
        );
    }

    #[test]
    fn test_request_defaults() {
        assert_eq!(PageRequest::from_params(None, None), PageRequest::default());
        assert_eq!(
            PageRequest::from_params(Some("abc"), Some("NaN")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::from_params(Some("-3"), Some("0")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::from_params(Some("3"), Some("25")),
            PageRequest { page: 3, limit: 25 }
        );
        assert_eq!(
            PageRequest::from_params(Some("2.7"), Some(" 5px")),
            PageRequest { page: 2, limit: 5 }
        );
        assert_eq!(
            PageRequest::from_params(Some("99999999999"), None),
            PageRequest { page: 1, limit: 10 }
        );
    }
}
