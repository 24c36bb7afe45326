//! Page arithmetic over (offset, limit, total rows)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

impl Pagination {
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit,
            total,
        }
    }

    /// ceil(total / limit)
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    /// 1-based page shown at the current offset
    pub fn current_page(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }

    /// Offset of the last page, 0 when there are no rows
    pub fn last_page_offset(&self) -> u64 {
        self.page_count().saturating_sub(1) * self.limit
    }

    pub fn first(&self) -> u64 {
        0
    }

    pub fn previous(&self) -> u64 {
        self.offset.saturating_sub(self.limit).min(self.last_page_offset())
    }

    pub fn next(&self) -> u64 {
        self.offset
            .saturating_add(self.limit)
            .min(self.last_page_offset())
    }

    pub fn last(&self) -> u64 {
        self.last_page_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_math() {
        let page = Pagination::new(0, 50, 97);
        assert_eq!(page.page_count(), 2);
        assert_eq!(page.last(), 50);
        assert_eq!(page.next(), 50);

        let last = Pagination::new(50, 50, 97);
        assert_eq!(last.next(), 50);
        assert_eq!(last.current_page(), 2);
        assert_eq!(last.previous(), 0);
    }

    #[test]
    fn test_exact_multiple_and_empty() {
        let page = Pagination::new(0, 50, 100);
        assert_eq!(page.page_count(), 2);
        assert_eq!(page.last(), 50);

        let empty = Pagination::new(0, 50, 0);
        assert_eq!(empty.page_count(), 0);
        assert_eq!(empty.next(), 0);
        assert_eq!(empty.last(), 0);
    }

    #[test]
    fn test_offset_past_the_end_is_clamped() {
        let shrunk = Pagination::new(150, 50, 97);
        assert_eq!(shrunk.previous(), 50);
        assert_eq!(shrunk.next(), 50);
    }
}
