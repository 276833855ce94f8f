//! Page windows and page metadata for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Zero-based page window. `size` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Validate raw query values. Pages past the end are allowed; they simply
    /// yield an empty slice.
    pub fn new(page: i64, size: i64) -> Result<Self, String> {
        let page = u32::try_from(page).map_err(|_| "page must be zero or greater".to_string())?;
        let size = u32::try_from(size)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or_else(|| "size must be at least 1".to_string())?;
        Ok(Self { page, size })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paging block of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub current_page: u32,
    pub total_page: u64,
    pub size: u32,
}

impl Paging {
    /// Echoes the requested page and size; `total_page` is
    /// `ceil(total / size)`, which is 0 when nothing matched.
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            current_page: request.page,
            total_page: total_pages(total, request.size),
            size: request.size,
        }
    }
}

pub fn total_pages(total: u64, size: u32) -> u64 {
    if total == 0 || size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(90, 10), 9);
        assert_eq!(total_pages(100, 10), 10);
    }

    #[test]
    fn test_paging_echoes_request() {
        let request = PageRequest::new(1000, 10).unwrap();
        let paging = Paging::new(request, 100);
        assert_eq!(paging, Paging { current_page: 1000, total_page: 10, size: 10 });

        let empty = Paging::new(PageRequest::new(3, 25).unwrap(), 0);
        assert_eq!(empty, Paging { current_page: 3, total_page: 0, size: 25 });
    }

    #[test]
    fn test_page_request_validation() {
        assert!(PageRequest::new(-1, 10).is_err());
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, -5).is_err());
        assert_eq!(PageRequest::new(2, 10).unwrap().offset(), 20);
        assert_eq!(PageRequest::default(), PageRequest { page: 0, size: 10 });
    }

    #[test]
    fn test_paging_serializes_camel_case() {
        let json = serde_json::to_value(Paging { current_page: 0, total_page: 0, size: 10 }).unwrap();
        assert_eq!(json, serde_json::json!({ "currentPage": 0, "totalPage": 0, "size": 10 }));
    }
}
