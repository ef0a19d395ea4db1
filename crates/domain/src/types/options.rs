//! Options for list operations

use crate::constants::MAX_PAGE_SIZE;

/// Filters for listing transactions
///
/// `since` and `until` accept `YYYY-MM-DD`, RFC 3339 timestamps, or relative
/// days such as `-30d`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionListOptions {
    pub since: Option<String>,
    pub until: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionListOptions {
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requested maximum, with zero meaning unlimited
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Page size to request: the API maximum, or the limit when smaller
    pub fn page_size(&self) -> usize {
        match self.effective_limit() {
            Some(limit) if limit < MAX_PAGE_SIZE => limit,
            _ => MAX_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_capped() {
        assert_eq!(TransactionListOptions::default().page_size(), 100);
        assert_eq!(TransactionListOptions::default().limit(25).page_size(), 25);
        assert_eq!(TransactionListOptions::default().limit(150).page_size(), 100);
        assert_eq!(TransactionListOptions::default().limit(0).page_size(), 100);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        assert_eq!(TransactionListOptions::default().limit(0).effective_limit(), None);
        assert_eq!(TransactionListOptions::default().limit(7).effective_limit(), Some(7));
    }
}
