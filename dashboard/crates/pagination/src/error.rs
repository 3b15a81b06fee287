//! Error types for the pagination crate.

use thiserror::Error;

/// Errors raised while constructing pagination primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page sizes must hold at least one record.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_formats_correctly() {
        assert_eq!(
            PaginationError::ZeroPageSize.to_string(),
            "page size must be greater than zero"
        );
    }
}
