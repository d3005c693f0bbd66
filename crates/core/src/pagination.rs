//! Page-number pagination for listing views.
//!
//! The `p` query parameter degrades instead of erroring: non-numeric input
//! falls back to page 1, out-of-range input clamps to the last page.

use serde::Serialize;

/// Fixed page size for submission and survey listings.
pub const PAGE_SIZE: i64 = 20;

/// Resolved pagination state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number after clamping.
    pub number: i64,
    pub total_pages: i64,
    pub total_items: i64,
    /// Row offset for the store query.
    #[serde(skip)]
    pub offset: i64,
    pub per_page: i64,
}

/// Parse the `p` query value; anything non-numeric or < 1 becomes page 1.
pub fn parse_page_param(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Clamp a requested page against the item count and compute the offset.
///
/// An empty result set still has one (empty) page so the view always has a
/// valid page to render.
pub fn page_info(requested: i64, total_items: i64, per_page: i64) -> PageInfo {
    let total_pages = if total_items <= 0 {
        1
    } else {
        (total_items + per_page - 1) / per_page
    };
    let number = requested.clamp(1, total_pages);
    PageInfo {
        number,
        total_pages,
        total_items: total_items.max(0),
        offset: (number - 1) * per_page,
        per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_page_param_falls_back_to_one() {
        assert_eq!(parse_page_param(Some("Hello world!")), 1);
        assert_eq!(parse_page_param(Some("")), 1);
        assert_eq!(parse_page_param(Some("-3")), 1);
        assert_eq!(parse_page_param(Some("0")), 1);
        assert_eq!(parse_page_param(None), 1);
        assert_eq!(parse_page_param(Some("4")), 4);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let info = page_info(99999, 45, PAGE_SIZE);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.number, 3);
        assert_eq!(info.offset, 40);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let info = page_info(2, 40, PAGE_SIZE);
        assert_eq!(info.total_pages, 2);
        assert_eq!(info.number, 2);
        assert_eq!(info.offset, 20);
    }

    #[test]
    fn empty_set_still_has_one_page() {
        let info = page_info(5, 0, PAGE_SIZE);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.number, 1);
        assert_eq!(info.offset, 0);
    }
}
