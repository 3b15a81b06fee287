//! Page arithmetic over an in-memory collection.
//!
//! ## Invariants
//! - `total_pages` is never zero; an empty collection has one (empty) page.
//! - The current page always lies within `1..=total_pages`.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::PaginationError;

/// Number of records shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: PageSize = PageSize(match NonZeroUsize::new(5) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
});

/// Number of records rendered on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Build a page size, returning `None` for zero.
    #[must_use]
    pub const fn new(size: usize) -> Option<Self> {
        match NonZeroUsize::new(size) {
            Some(size) => Some(Self(size)),
            None => None,
        }
    }

    /// Fallible constructor used when the size comes from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub const fn try_new(size: usize) -> Result<Self, PaginationError> {
        match Self::new(size) {
            Some(page_size) => Ok(page_size),
            None => Err(PaginationError::ZeroPageSize),
        }
    }

    /// Return the size as a plain integer.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        DEFAULT_PAGE_SIZE
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PaginationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Number of pages needed for `len` records, never less than one.
///
/// # Examples
///
/// ```
/// use pagination::{PageSize, total_pages};
///
/// let size = PageSize::new(5).expect("non-zero");
/// assert_eq!(total_pages(0, size), 1);
/// assert_eq!(total_pages(10, size), 2);
/// assert_eq!(total_pages(11, size), 3);
/// ```
#[must_use]
pub const fn total_pages(len: usize, size: PageSize) -> usize {
    let pages = len.div_ceil(size.get());
    if pages == 0 { 1 } else { pages }
}

/// Clamp a requested page into `1..=total_pages`.
///
/// Requests of zero or below resolve to the first page; requests beyond the
/// end resolve to the last page.
#[must_use]
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let last = total_pages.max(1);
    match usize::try_from(requested) {
        Ok(0) | Err(_) => 1,
        Ok(page) => page.min(last),
    }
}

/// One page of a collection together with the derived page state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a, T> {
    items: &'a [T],
    requested_page: i64,
    current_page: usize,
    total_pages: usize,
    total_items: usize,
    page_size: PageSize,
}

impl<'a, T> PageView<'a, T> {
    /// Records visible on the current page.
    #[must_use]
    pub const fn items(&self) -> &'a [T] {
        self.items
    }

    /// Page number as it was requested, before clamping.
    #[must_use]
    pub const fn requested_page(&self) -> i64 {
        self.requested_page
    }

    /// Clamped, one-based page number.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages in the collection.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of records in the whole collection.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Page size used to slice the collection.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Whether the requested page had to be corrected.
    ///
    /// Consumers must write the corrected page back to wherever the request
    /// came from so later reads agree with what was rendered.
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        i64::try_from(self.current_page).map_or(true, |current| current != self.requested_page)
    }

    /// Serialisable summary of the page state.
    #[must_use]
    pub const fn meta(&self) -> PageMeta {
        PageMeta {
            current_page: self.current_page,
            total_pages: self.total_pages,
            page_size: self.page_size.get(),
            total_items: self.total_items,
        }
    }
}

/// Page state without the records, suitable for JSON envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Clamped, one-based page number.
    pub current_page: usize,
    /// Number of pages in the collection.
    pub total_pages: usize,
    /// Records per page.
    pub page_size: usize,
    /// Records in the whole collection.
    pub total_items: usize,
}

/// Slice `records` into the page closest to `requested`.
///
/// # Examples
///
/// ```
/// use pagination::{PageSize, paginate};
///
/// let records = ["a", "b", "c"];
/// let view = paginate(&records, PageSize::new(2).expect("non-zero"), -4);
///
/// assert_eq!(view.current_page(), 1);
/// assert_eq!(view.items(), &["a", "b"]);
/// ```
#[must_use]
pub fn paginate<T>(records: &[T], size: PageSize, requested: i64) -> PageView<'_, T> {
    let total_items = records.len();
    let total_pages = total_pages(total_items, size);
    let current_page = clamp_page(requested, total_pages);

    let start = current_page
        .saturating_sub(1)
        .saturating_mul(size.get())
        .min(total_items);
    let end = start.saturating_add(size.get()).min(total_items);
    let items = records.get(start..end).unwrap_or_default();

    PageView {
        items,
        requested_page: requested,
        current_page,
        total_pages,
        total_items,
        page_size: size,
    }
}
