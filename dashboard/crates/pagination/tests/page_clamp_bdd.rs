//! Behavioural tests for page clamping and the `page` query parameter.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pagination::{PageSize, paginate, read_page_param, with_page_param};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use url::Url;

#[derive(Default, ScenarioState)]
struct World {
    records: Slot<Vec<u32>>,
    page_size: Slot<PageSize>,
    requested: Slot<i64>,
    location: Slot<Url>,
}

impl World {
    fn records(&self) -> Vec<u32> {
        self.records.get().expect("records should be set")
    }

    fn page_size(&self) -> PageSize {
        self.page_size.get().expect("page size should be set")
    }

    fn requested(&self) -> i64 {
        self.requested.get().expect("a page should be requested")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("a collection of {count:u32} records paged by {size:usize}")]
fn a_collection_of_records(world: &World, count: u32, size: usize) {
    world.records.set((1..=count).collect());
    world
        .page_size
        .set(PageSize::new(size).expect("non-zero page size"));
}

#[given("the location {raw}")]
fn the_location(world: &World, raw: String) {
    let trimmed = raw.trim_matches('"');
    world
        .location
        .set(Url::parse(trimmed).expect("valid location"));
}

#[when("page {page:i64} is requested")]
fn page_is_requested(world: &World, page: i64) {
    world.requested.set(page);
}

#[when("the last record is removed")]
fn the_last_record_is_removed(world: &World) {
    let mut records = world.records();
    records.pop();
    world.records.set(records);
}

#[when("the page is read from the location")]
fn the_page_is_read_from_the_location(world: &World) {
    let location = world.location.get().expect("location should be set");
    world.requested.set(read_page_param(&location).requested());
}

#[when("the corrected page is written back")]
fn the_corrected_page_is_written_back(world: &World) {
    let records = world.records();
    let view = paginate(&records, world.page_size(), world.requested());
    assert!(view.was_clamped(), "expected the request to need correcting");

    let location = world.location.get().expect("location should be set");
    world
        .location
        .set(with_page_param(&location, view.current_page()));
}

#[then("page {current:usize} of {total:usize} is shown")]
fn page_of_total_is_shown(world: &World, current: usize, total: usize) {
    let records = world.records();
    let view = paginate(&records, world.page_size(), world.requested());
    assert_eq!(view.current_page(), current);
    assert_eq!(view.total_pages(), total);
    assert!(!view.items().is_empty() || records.is_empty());
}

#[then("the request is reported as clamped")]
fn the_request_is_reported_as_clamped(world: &World) {
    let records = world.records();
    let view = paginate(&records, world.page_size(), world.requested());
    assert!(view.was_clamped());
}

#[then("the location query is {expected}")]
fn the_location_query_is(world: &World, expected: String) {
    let location = world.location.get().expect("location should be set");
    assert_eq!(location.query(), Some(expected.trim_matches('"')));
}

#[scenario(
    path = "tests/features/page_clamp.feature",
    name = "Requesting a page beyond the end shows the last page"
)]
fn requesting_a_page_beyond_the_end(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/page_clamp.feature",
    name = "A non-positive page shows the first page"
)]
fn a_non_positive_page_shows_the_first_page(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/page_clamp.feature",
    name = "Shrinking the collection clamps the current page"
)]
fn shrinking_the_collection_clamps_the_current_page(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/page_clamp.feature",
    name = "Writing the corrected page back to the location"
)]
fn writing_the_corrected_page_back(world: World) {
    let _ = world;
}
