//! Page-number feedback loop between a collection and a [`PageLocation`].

use pagination::{PageParam, PageSize, PageView, paginate};
use tracing::{debug, warn};

use crate::domain::User;
use crate::domain::ports::{HistoryMode, PageLocation};

/// Derives the visible page and keeps the stored page number valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageController {
    page_size: PageSize,
}

impl PageController {
    /// Controller slicing pages of `page_size` records.
    #[must_use]
    pub const fn new(page_size: PageSize) -> Self {
        Self { page_size }
    }

    /// Records per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Visible page for `records` at the page stored in `location`.
    ///
    /// A missing, malformed or out-of-range page parameter is rewritten in
    /// place with [`HistoryMode::Replace`] so the location always names the
    /// page being shown.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::PageController;
    /// use dashboard::outbound::location::UrlPageLocation;
    /// use pagination::PageSize;
    /// use url::Url;
    ///
    /// let start = Url::parse("https://dash.example/users?page=4").expect("url");
    /// let mut location = UrlPageLocation::new(start);
    /// let records: Vec<dashboard::domain::User> = Vec::new();
    ///
    /// let view = PageController::new(PageSize::default()).view(&mut location, &records);
    /// assert_eq!(view.current_page(), 1);
    /// assert_eq!(location.current().query(), Some("page=1"));
    /// ```
    pub fn view<'a, L>(&self, location: &mut L, records: &'a [User]) -> PageView<'a, User>
    where
        L: PageLocation + ?Sized,
    {
        let param = location.page_param();
        let view = paginate(records, self.page_size, param.requested());
        let current = view.current_page();
        match param {
            PageParam::Missing => {
                debug!(page = current, "page parameter missing");
                location.write_page(current, HistoryMode::Replace);
            }
            PageParam::Invalid(raw) => {
                warn!(%raw, page = current, "page parameter is not a number");
                location.write_page(current, HistoryMode::Replace);
            }
            PageParam::Value(requested) if view.was_clamped() => {
                warn!(
                    requested,
                    page = current,
                    total_pages = view.total_pages(),
                    "page clamped"
                );
                location.write_page(current, HistoryMode::Replace);
            }
            PageParam::Value(_) => {}
        }
        view
    }

    /// Navigate to `page`, adding a history entry.
    ///
    /// The next [`Self::view`] clamps it if it is out of range.
    pub fn go_to<L>(&self, location: &mut L, page: usize)
    where
        L: PageLocation + ?Sized,
    {
        debug!(page, "page navigation");
        location.write_page(page, HistoryMode::Push);
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockPageLocation;
    use crate::domain::{UserFields, UserId};

    fn records(count: i64) -> Vec<User> {
        (1..=count)
            .map(|id| User::new(UserId::from(id), UserFields::default()))
            .collect()
    }

    #[fixture]
    fn controller() -> PageController {
        PageController::default()
    }

    fn location_with(param: PageParam) -> MockPageLocation {
        let mut location = MockPageLocation::new();
        location.expect_page_param().return_const(param);
        location
    }

    #[rstest]
    fn valid_page_is_left_alone(controller: PageController) {
        let mut location = location_with(PageParam::Value(2));
        location.expect_write_page().never();
        let users = records(12);

        let view = controller.view(&mut location, &users);

        assert_eq!(view.current_page(), 2);
        assert_eq!(view.items().len(), 5);
        assert_eq!(view.items().first().map(|u| u.id.clone()), Some(UserId::Number(6)));
    }

    #[rstest]
    #[case::beyond_end(PageParam::Value(5), 12, 3)]
    #[case::zero(PageParam::Value(0), 12, 1)]
    #[case::negative(PageParam::Value(-4), 12, 1)]
    #[case::missing(PageParam::Missing, 12, 1)]
    #[case::not_a_number(PageParam::Invalid("two".to_owned()), 12, 1)]
    #[case::after_shrink(PageParam::Value(3), 10, 2)]
    fn corrections_replace_the_stored_page(
        controller: PageController,
        #[case] param: PageParam,
        #[case] count: i64,
        #[case] expected: usize,
    ) {
        let mut location = location_with(param);
        location
            .expect_write_page()
            .with(eq(expected), eq(HistoryMode::Replace))
            .times(1)
            .return_const(());
        let users = records(count);

        let view = controller.view(&mut location, &users);

        assert_eq!(view.current_page(), expected);
    }

    #[rstest]
    fn navigation_pushes_a_history_entry(controller: PageController) {
        let mut location = MockPageLocation::new();
        location
            .expect_write_page()
            .with(eq(3), eq(HistoryMode::Push))
            .times(1)
            .return_const(());

        controller.go_to(&mut location, 3);
    }

    #[test]
    fn empty_collection_shows_one_empty_page() {
        let controller = PageController::new(PageSize::new(2).expect("non-zero"));
        let mut location = location_with(PageParam::Value(1));
        location.expect_write_page().never();

        let view = controller.view(&mut location, &[]);

        assert_eq!(view.total_pages(), 1);
        assert!(view.items().is_empty());
    }
}
