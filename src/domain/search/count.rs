//! Count-skip estimation for paginated queries
//!
//! A total can be derived from the page itself when the page proves where
//! the result set ends. The content query fetches one row beyond the page
//! size; `has_more` records whether that extra row came back.

use super::page::PageRequest;

/// What the content query revealed about the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalHint {
    pub page_number: u32,
    pub page_size: u32,
    pub offset: u64,
    pub content_len: usize,
    pub has_more: bool,
}

impl TotalHint {
    pub fn new(request: &PageRequest, content_len: usize, has_more: bool) -> Self {
        Self {
            page_number: request.page_number(),
            page_size: request.page_size(),
            offset: request.offset(),
            content_len,
            has_more,
        }
    }
}

/// Outcome of [`resolve_total`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCount {
    /// Exact total computed without a count query
    Known(u64),
    /// The total is not provable from the page; run the count query
    NeedsCount,
}

/// Decide whether the total is locally computable. Never approximates.
pub fn resolve_total(hint: &TotalHint) -> TotalCount {
    let len = hint.content_len as u64;

    if hint.has_more {
        return TotalCount::NeedsCount;
    }

    // An under-full first page holds the whole result set.
    if hint.page_number == 0 && len < u64::from(hint.page_size) {
        return TotalCount::Known(len);
    }

    // Rows came back and nothing lies beyond them: this is the last page.
    if len > 0 {
        return TotalCount::Known(hint.offset + len);
    }

    // Empty page past the start; the data ends somewhere before the offset.
    TotalCount::NeedsCount
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(page_number: u32, page_size: u32, content_len: usize, has_more: bool) -> TotalHint {
        TotalHint {
            page_number,
            page_size,
            offset: u64::from(page_number) * u64::from(page_size),
            content_len,
            has_more,
        }
    }

    #[test]
    fn test_first_page_short() {
        assert_eq!(resolve_total(&hint(0, 10, 4, false)), TotalCount::Known(4));
    }

    #[test]
    fn test_first_page_empty() {
        assert_eq!(resolve_total(&hint(0, 10, 0, false)), TotalCount::Known(0));
    }

    #[test]
    fn test_full_page_with_more_rows_needs_count() {
        // page 0 of size 3 from a 5-row total
        assert_eq!(resolve_total(&hint(0, 3, 3, true)), TotalCount::NeedsCount);
    }

    #[test]
    fn test_full_first_page_without_more_rows() {
        assert_eq!(resolve_total(&hint(0, 3, 3, false)), TotalCount::Known(3));
    }

    #[test]
    fn test_last_page_partial() {
        assert_eq!(resolve_total(&hint(1, 3, 2, false)), TotalCount::Known(5));
    }

    #[test]
    fn test_last_page_exactly_full() {
        assert_eq!(resolve_total(&hint(2, 3, 3, false)), TotalCount::Known(9));
    }

    #[test]
    fn test_middle_page_needs_count() {
        assert_eq!(resolve_total(&hint(1, 3, 3, true)), TotalCount::NeedsCount);
    }

    #[test]
    fn test_page_past_end_needs_count() {
        assert_eq!(resolve_total(&hint(5, 3, 0, false)), TotalCount::NeedsCount);
    }

    #[test]
    fn test_hint_from_request() {
        let request = PageRequest::new(2, 25).unwrap();
        let hint = TotalHint::new(&request, 7, false);

        assert_eq!(hint.offset, 50);
        assert_eq!(hint.page_size, 25);
        assert_eq!(resolve_total(&hint), TotalCount::Known(57));
    }
}
