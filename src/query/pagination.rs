// src/query/pagination.rs

//! Pagination over a server result set with no total count.
//!
//! "More may exist" is inferred from the last fetched page being full.

/// Page bookkeeping for one listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    /// Length of the last page fetched for `page`, before refinement
    last_len: Option<usize>,
}

impl Pagination {
    /// New controller on page 1. A zero page size is treated as 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            last_len: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Server offset of the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Length of the last fetched page, if one arrived for this page.
    pub fn last_len(&self) -> Option<usize> {
        self.last_len
    }

    /// Record the size of the page the server returned.
    pub fn record_page(&mut self, len: usize) {
        self.last_len = Some(len);
    }

    fn last_page_full(&self) -> bool {
        self.last_len == Some(self.page_size as usize)
    }

    pub fn can_next(&self) -> bool {
        self.last_page_full()
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    /// Controls stay visible on a partial last page so users can go back.
    pub fn show_controls(&self) -> bool {
        self.last_page_full() || self.page > 1
    }

    /// Advance one page if allowed.
    pub fn go_next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.set_page(self.page + 1);
        true
    }

    /// Go back one page if allowed.
    pub fn go_prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.set_page(self.page - 1);
        true
    }

    /// Jump to `page` (clamped to >= 1). The last page length is forgotten
    /// when the page actually changes.
    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if page != self.page {
            self.page = page;
            self.last_len = None;
        }
    }

    /// Back to page 1 with nothing fetched.
    pub fn reset(&mut self) {
        self.page = 1;
        self.last_len = None;
    }

    /// Change the page size; always resets to page 1.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_page_enables_next() {
        let mut p = Pagination::new(8);
        p.record_page(8);
        assert!(p.can_next());
        assert!(!p.can_prev());
        assert!(p.show_controls());
    }

    #[test]
    fn test_partial_page_disables_next() {
        let mut p = Pagination::new(8);
        p.record_page(5);
        assert!(!p.can_next());
        assert!(!p.show_controls());

        p.set_page(2);
        p.record_page(5);
        assert!(!p.can_next());
        assert!(p.can_prev());
        assert!(p.show_controls());
    }

    #[test]
    fn test_nothing_fetched_disables_next() {
        let p = Pagination::new(8);
        assert!(!p.can_next());
        assert!(!p.show_controls());
    }

    #[test]
    fn test_go_next_and_prev() {
        let mut p = Pagination::new(12);
        assert!(!p.go_next());

        p.record_page(12);
        assert!(p.go_next());
        assert_eq!(p.page(), 2);
        assert_eq!(p.offset(), 12);
        // Unknown until page 2 arrives
        assert!(!p.go_next());

        assert!(p.go_prev());
        assert_eq!(p.page(), 1);
        assert!(!p.go_prev());
    }

    #[test]
    fn test_page_size_change_resets() {
        let mut p = Pagination::new(8);
        p.record_page(8);
        p.go_next();
        p.set_page_size(12);
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 12);
        assert_eq!(p.last_len(), None);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let p = Pagination::new(0);
        assert_eq!(p.page_size(), 1);
    }
}
