//! Driven port for the externally addressable page number.

use pagination::PageParam;

/// How a page write affects navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Add a new history entry (user navigation).
    Push,
    /// Overwrite the current entry (corrections).
    Replace,
}

/// Somewhere the current page number is stored, such as a URL query string.
#[cfg_attr(test, mockall::automock)]
pub trait PageLocation {
    /// Raw `page` parameter as currently stored.
    fn page_param(&self) -> PageParam;

    /// Store `page` as the current page.
    fn write_page(&mut self, page: usize, mode: HistoryMode);
}
