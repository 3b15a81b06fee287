//! URL-backed page location.
//!
//! Models a browser address bar: the page number lives in the `page` query
//! parameter and writes either push a new history entry or replace the
//! current one.

use pagination::{PageParam, read_page_param, with_page_param};
use url::Url;

use crate::domain::ports::{HistoryMode, PageLocation};

/// Page location stored in a URL with a navigation history.
///
/// ## Invariants
/// - [`UrlPageLocation::history`] is never empty and ends with the current
///   location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPageLocation {
    current: Url,
    previous: Vec<Url>,
}

impl UrlPageLocation {
    /// Start at `location` with no earlier history.
    #[must_use]
    pub fn new(location: Url) -> Self {
        Self {
            current: location,
            previous: Vec::new(),
        }
    }

    /// The current location.
    #[must_use]
    pub fn current(&self) -> &Url {
        &self.current
    }

    /// Every entry, oldest first, ending with the current location.
    pub fn history(&self) -> impl Iterator<Item = &Url> {
        self.previous.iter().chain(std::iter::once(&self.current))
    }

    /// Number of history entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.previous.len() + 1
    }

    /// Always `false`: a location has at least its current entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl PageLocation for UrlPageLocation {
    fn page_param(&self) -> PageParam {
        read_page_param(&self.current)
    }

    fn write_page(&mut self, page: usize, mode: HistoryMode) {
        let next = with_page_param(&self.current, page);
        match mode {
            HistoryMode::Push => {
                let previous = std::mem::replace(&mut self.current, next);
                self.previous.push(previous);
            }
            HistoryMode::Replace => self.current = next,
        }
    }
}
