//! Codec for the `page` query parameter.
//!
//! The page number lives in the location's query string so it survives
//! reloads and can be shared. Reading is lenient; writing preserves every
//! other query pair in its original order.

use url::Url;

/// Query-string key carrying the one-based page number.
pub const PAGE_PARAM: &str = "page";

/// Raw state of the `page` parameter in a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParam {
    /// No `page` pair is present.
    Missing,
    /// A `page` pair is present but does not parse as an integer.
    Invalid(String),
    /// A `page` pair holding an integer, possibly out of range.
    Value(i64),
}

impl PageParam {
    /// Page number to request: the parsed value, or `1` when missing or
    /// malformed.
    #[must_use]
    pub const fn requested(&self) -> i64 {
        match self {
            Self::Value(page) => *page,
            Self::Missing | Self::Invalid(_) => 1,
        }
    }
}

/// Read the first `page` pair from `location`.
///
/// # Examples
///
/// ```
/// use pagination::{PageParam, read_page_param};
/// use url::Url;
///
/// let url = Url::parse("https://example.test/users?page=3").expect("url");
/// assert_eq!(read_page_param(&url), PageParam::Value(3));
///
/// let url = Url::parse("https://example.test/users?page=abc").expect("url");
/// assert_eq!(read_page_param(&url).requested(), 1);
/// ```
#[must_use]
pub fn read_page_param(location: &Url) -> PageParam {
    location
        .query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .map_or(PageParam::Missing, |(_, raw)| {
            raw.trim()
                .parse::<i64>()
                .map_or_else(|_| PageParam::Invalid(raw.into_owned()), PageParam::Value)
        })
}

/// Return a copy of `location` whose `page` pair holds `page`.
///
/// The first existing `page` pair is rewritten in place and any duplicates
/// are dropped; when absent the pair is appended.
#[must_use]
pub fn with_page_param(location: &Url, page: usize) -> Url {
    let value = page.to_string();
    let mut written = false;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for (key, raw) in location.query_pairs() {
        if key == PAGE_PARAM {
            if !written {
                pairs.push((key.into_owned(), value.clone()));
                written = true;
            }
        } else {
            pairs.push((key.into_owned(), raw.into_owned()));
        }
    }
    if !written {
        pairs.push((PAGE_PARAM.to_owned(), value));
    }

    let mut updated = location.clone();
    updated.query_pairs_mut().clear().extend_pairs(pairs);
    updated
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid test url")
    }

    #[rstest]
    #[case::missing("https://example.test/users", PageParam::Missing)]
    #[case::numeric("https://example.test/users?page=2", PageParam::Value(2))]
    #[case::negative("https://example.test/users?page=-4", PageParam::Value(-4))]
    #[case::zero("https://example.test/users?page=0", PageParam::Value(0))]
    #[case::word("https://example.test/users?page=two", PageParam::Invalid("two".into()))]
    #[case::empty("https://example.test/users?page=", PageParam::Invalid(String::new()))]
    #[case::first_wins("https://example.test/users?page=3&page=9", PageParam::Value(3))]
    fn reads_page_param(#[case] raw: &str, #[case] expected: PageParam) {
        assert_eq!(read_page_param(&url(raw)), expected);
    }

    #[rstest]
    #[case::missing(PageParam::Missing, 1)]
    #[case::invalid(PageParam::Invalid("x".into()), 1)]
    #[case::value(PageParam::Value(7), 7)]
    fn requested_falls_back_to_first_page(#[case] param: PageParam, #[case] expected: i64) {
        assert_eq!(param.requested(), expected);
    }

    #[test]
    fn appends_page_when_absent() {
        let updated = with_page_param(&url("https://example.test/users?sort=name"), 1);
        assert_eq!(updated.query(), Some("sort=name&page=1"));
    }

    #[test]
    fn rewrites_page_in_place_and_keeps_other_pairs() {
        let updated = with_page_param(&url("https://example.test/users?page=9&filter=a%20b"), 2);
        assert_eq!(updated.query(), Some("page=2&filter=a+b"));
        assert_eq!(read_page_param(&updated), PageParam::Value(2));
    }

    #[test]
    fn drops_duplicate_page_pairs() {
        let updated = with_page_param(&url("https://example.test/users?page=3&q=x&page=4"), 1);
        assert_eq!(updated.query(), Some("page=1&q=x"));
    }

    #[test]
    fn preserves_path_and_fragment() {
        let updated = with_page_param(&url("https://example.test/admin/users#top"), 4);
        assert_eq!(updated.path(), "/admin/users");
        assert_eq!(updated.fragment(), Some("top"));
        assert_eq!(updated.query(), Some("page=4"));
    }
}
