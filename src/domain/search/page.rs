//! Offset pagination primitives

use super::sort::Sort;
use crate::domain::DomainError;

/// A validated page request: zero-based page number, positive size and an
/// optional sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Validate raw pagination parameters before any query runs
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, DomainError> {
        if page_number < 0 {
            return Err(DomainError::validation(format!(
                "Page number must not be negative, got {}",
                page_number
            )));
        }

        if page_size <= 0 {
            return Err(DomainError::validation(format!(
                "Page size must be positive, got {}",
                page_size
            )));
        }

        let page_number = u32::try_from(page_number).map_err(|_| {
            DomainError::validation(format!("Page number {} is too large", page_number))
        })?;
        let page_size = u32::try_from(page_size).map_err(|_| {
            DomainError::validation(format!("Page size {} is too large", page_size))
        })?;

        Ok(Self {
            page_number,
            page_size,
            sort: Sort::unsorted(),
        })
    }

    /// Set the sort (builder pattern)
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Reject page sizes above the configured maximum
    pub fn ensure_max_size(&self, max_page_size: u32) -> Result<(), DomainError> {
        if self.page_size > max_page_size {
            return Err(DomainError::validation(format!(
                "Page size {} exceeds the maximum of {}",
                self.page_size, max_page_size
            )));
        }

        Ok(())
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Index of the first row of this page in the full result set
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

/// A page of results together with the total size of the unsliced set
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    content: Vec<T>,
    total: u64,
    page_number: u32,
    page_size: u32,
}

impl<T> Page<T> {
    /// Build a page with the total exactly as the repository reported it
    pub fn new(content: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            content,
            total,
            page_number: request.page_number(),
            page_size: request.page_size(),
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn is_first(&self) -> bool {
        self.page_number == 0
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) + 1 < self.total_pages()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Convert the content while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total: self.total,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::sort::{SortKey, SortOrder};

    #[test]
    fn test_page_request_validation() {
        assert!(PageRequest::new(0, 1).is_ok());
        assert!(PageRequest::new(-1, 10).is_err());
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, -5).is_err());
        assert!(PageRequest::new(i64::from(u32::MAX) + 1, 10).is_err());
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::new(3, 20).unwrap();
        assert_eq!(request.offset(), 60);
        assert!(request.sort().is_unsorted());
    }

    #[test]
    fn test_page_request_with_sort() {
        let request = PageRequest::new(0, 5)
            .unwrap()
            .with_sort(Sort::by(SortOrder::desc(SortKey::Age)));

        assert_eq!(request.sort().orders().len(), 1);
    }

    #[test]
    fn test_max_page_size() {
        let request = PageRequest::new(0, 2001).unwrap();
        assert!(request.ensure_max_size(2000).is_err());
        assert!(request.ensure_max_size(2001).is_ok());
    }

    #[test]
    fn test_page_metadata() {
        let request = PageRequest::new(0, 3).unwrap();
        let page = Page::new(vec![1, 2, 3], &request, 4);

        assert_eq!(page.total(), 4);
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_first());
        assert!(page.has_next());
        assert!(!page.is_last());
    }

    #[test]
    fn test_last_page_metadata() {
        let request = PageRequest::new(1, 3).unwrap();
        let page = Page::new(vec![4], &request, 4);

        assert!(!page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_empty_page() {
        let request = PageRequest::new(0, 10).unwrap();
        let page: Page<i32> = Page::new(Vec::new(), &request, 0);

        assert_eq!(page.total(), 0);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_last());
    }

    #[test]
    fn test_total_kept_as_reported() {
        let request = PageRequest::new(1, 2).unwrap();
        let page = Page::new(vec!["c", "d"], &request, 1);

        assert_eq!(page.total(), 1);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let request = PageRequest::new(2, 2).unwrap();
        let page = Page::new(vec![1, 2], &request, 10).map(|n| n * 10);

        assert_eq!(page.content(), &[10, 20]);
        assert_eq!(page.total(), 10);
        assert_eq!(page.page_number(), 2);
        assert_eq!(page.page_size(), 2);
    }
}
