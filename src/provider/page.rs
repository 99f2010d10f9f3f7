use super::ProviderError;

/// A validated 1-indexed window over jokes ordered by id.
///
/// Pages are stable as long as nothing is deleted between calls; concurrent
/// inserts can still shift later pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: i64,
    limit: i64,
}

impl Page {
    pub fn new(number: i64, limit: i64) -> Result<Self, ProviderError> {
        if number < 1 {
            return Err(ProviderError::invalid_argument(format!(
                "page must be at least 1, got {}",
                number
            )));
        }
        if limit < 1 {
            return Err(ProviderError::invalid_argument(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }
        Ok(Self { number, limit })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`
    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.limit)
    }
}
