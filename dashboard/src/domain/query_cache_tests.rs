//! Tests for the tag-invalidated query cache.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;

use rstest::{fixture, rstest};
use tokio::sync::Semaphore;

use super::*;
use crate::domain::ports::MockUsersRemote;
use crate::domain::{CollectionStatus, ErrorCode, UserFields};
use crate::outbound::memory::InMemoryUsersRemote;

fn user(id: i64, name: &str) -> User {
    let mut fields = UserFields::default();
    fields.set("name", name);
    fields.set("email", format!("{}@example.org", name.to_lowercase()));
    User::new(UserId::from(id), fields)
}

#[fixture]
fn two_users() -> Vec<User> {
    vec![user(1, "Ada"), user(2, "Grace")]
}

fn names(snapshot: &QuerySnapshot) -> Vec<String> {
    snapshot
        .collection()
        .records()
        .iter()
        .filter_map(|u| u.fields.name.clone())
        .collect()
}

/// Remote whose `list` blocks until the test releases a permit.
struct GatedRemote {
    gate: Semaphore,
    calls: AtomicUsize,
    responses: Mutex<VecDeque<Vec<User>>>,
}

impl GatedRemote {
    fn new(responses: Vec<Vec<User>>) -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            responses: Mutex::new(responses.into()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn wait_for_calls(&self, expected: usize) {
        while self.calls() < expected {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl UsersRemote for GatedRemote {
    async fn list(&self) -> Result<Vec<User>, UsersRemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map_err(|_| UsersRemoteError::network("gate closed"))?
            .forget();
        let mut responses = self.responses.lock().expect("responses lock");
        responses
            .pop_front()
            .ok_or_else(|| UsersRemoteError::network("no scripted response"))
    }

    async fn create(&self, _draft: &UserDraft) -> Result<User, UsersRemoteError> {
        Err(UsersRemoteError::network("unsupported"))
    }

    async fn update(&self, _id: &UserId, _fields: &UserFields) -> Result<User, UsersRemoteError> {
        Err(UsersRemoteError::network("unsupported"))
    }

    async fn delete(&self, _id: &UserId) -> Result<(), UsersRemoteError> {
        Err(UsersRemoteError::network("unsupported"))
    }
}

#[test]
fn new_cache_is_stale_and_empty() {
    let cache = UsersQueryCache::new(Arc::new(MockUsersRemote::new()));

    assert!(cache.is_stale());
    assert_eq!(cache.generation(), 1);
    assert_eq!(cache.snapshot().data_generation(), 0);
    assert!(cache.snapshot().collection().records().is_empty());
}

#[rstest]
#[tokio::test]
async fn fresh_data_is_served_without_refetching(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    let cache = UsersQueryCache::new(Arc::new(remote));

    let first = cache.ensure_fresh().await.expect("first read");
    let second = cache.ensure_fresh().await.expect("second read");

    assert_eq!(first, second);
    assert_eq!(names(&second), ["Ada", "Grace"]);
    assert_eq!(second.data_generation(), 1);
    assert!(!cache.is_stale());
}

#[rstest]
#[tokio::test]
async fn concurrent_readers_share_one_request(two_users: Vec<User>) {
    let remote = Arc::new(GatedRemote::new(vec![two_users]));
    let cache = UsersQueryCache::new(Arc::clone(&remote));

    let (first, second, ()) = tokio::join!(cache.fetch(), cache.fetch(), async {
        remote.wait_for_calls(1).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        remote.gate.add_permits(1);
    });

    assert_eq!(remote.calls(), 1);
    assert_eq!(first.expect("first reader"), second.expect("second reader"));
}

#[rstest]
#[tokio::test]
async fn fetch_started_before_an_invalidation_refetches(two_users: Vec<User>) {
    let newer = vec![user(1, "Ada"), user(2, "Grace"), user(3, "Barbara")];
    let remote = Arc::new(GatedRemote::new(vec![two_users, newer]));
    let cache = UsersQueryCache::new(Arc::clone(&remote));

    let (settled, ()) = tokio::join!(cache.fetch(), async {
        remote.wait_for_calls(1).await;
        cache.invalidate(CacheTag::Users);
        remote.gate.add_permits(2);
    });

    let settled = settled.expect("fetch settles");
    assert_eq!(remote.calls(), 2);
    assert_eq!(settled.data_generation(), 2);
    assert_eq!(names(&settled), ["Ada", "Grace", "Barbara"]);
}

#[rstest]
#[tokio::test]
async fn invalidation_without_readers_defers_the_refetch(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    let mut seq = mockall::Sequence::new();
    let initial = two_users.clone();
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(initial));
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(vec![user(2, "Grace")]));
    let cache = UsersQueryCache::new(Arc::new(remote));
    cache.ensure_fresh().await.expect("initial read");

    cache.invalidate(CacheTag::Users);
    assert!(cache.is_stale());
    assert_eq!(names(&cache.snapshot()), ["Ada", "Grace"]);

    let refreshed = cache.ensure_fresh().await.expect("refetch on read");
    assert_eq!(names(&refreshed), ["Grace"]);
    assert_eq!(refreshed.data_generation(), 2);
}

#[rstest]
#[tokio::test]
async fn create_refetches_for_active_readers(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    let mut seq = mockall::Sequence::new();
    let initial = two_users.clone();
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(initial));
    remote
        .expect_create()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(user(11, "Barbara")));
    let mut refreshed = two_users;
    refreshed.push(user(11, "Barbara"));
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(refreshed));
    let cache = UsersQueryCache::new(Arc::new(remote));
    let mut subscription = cache.subscribe();
    cache.ensure_fresh().await.expect("initial read");

    let mut draft = UserDraft::default();
    draft.set("name", "Barbara");
    let created = cache.create(&draft).await.expect("create succeeds");

    assert_eq!(created.id, UserId::Number(11));
    let settled = subscription
        .wait_for_generation(cache.generation())
        .await
        .expect("cache alive");
    assert_eq!(names(&settled), ["Ada", "Grace", "Barbara"]);
}

#[rstest]
#[tokio::test]
async fn update_sends_merged_cached_fields(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    remote
        .expect_update()
        .withf(|id, fields| {
            id == &UserId::Number(2)
                && fields.name.as_deref() == Some("Grace Hopper")
                && fields.email.as_deref() == Some("grace@example.org")
        })
        .times(1)
        .return_once(|id, fields| Ok(User::new(id.clone(), fields.clone())));
    let cache = UsersQueryCache::new(Arc::new(remote));

    let mut patch = UserPatch::default();
    patch.set("name", "Grace Hopper");
    let updated = cache
        .update(&UserId::Number(2), &patch)
        .await
        .expect("update succeeds");

    assert_eq!(updated.fields.name.as_deref(), Some("Grace Hopper"));
    assert_eq!(cache.generation(), 2);
    assert!(cache.is_stale());
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_id_skips_the_server(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    let cache = UsersQueryCache::new(Arc::new(remote));
    cache.ensure_fresh().await.expect("initial read");

    let error = cache
        .update(&UserId::Number(99), &UserPatch::default())
        .await
        .expect_err("unknown id");

    assert_eq!(error.code(), ErrorCode::UnknownUser);
    assert_eq!(cache.generation(), 1);
}

#[rstest]
#[tokio::test]
async fn failed_mutation_leaves_the_cache_fresh(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    remote.expect_delete().times(1).return_once(|_| {
        Err(UsersRemoteError::remote(
            500,
            Some("database offline".to_owned()),
        ))
    });
    let cache = UsersQueryCache::new(Arc::new(remote));
    cache.ensure_fresh().await.expect("initial read");

    let error = cache
        .delete(&UserId::Number(1))
        .await
        .expect_err("delete fails");

    assert_eq!(error.server_message(), Some("database offline"));
    assert!(!cache.is_stale());
    assert_eq!(names(&cache.snapshot()), ["Ada", "Grace"]);
    assert_eq!(
        cache.snapshot().collection().status(),
        CollectionStatus::Idle
    );
}

#[rstest]
#[tokio::test]
async fn failed_fetch_keeps_previous_data(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    let mut seq = mockall::Sequence::new();
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || Ok(two_users));
    remote
        .expect_list()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|| Err(UsersRemoteError::decode("expected array")));
    let cache = UsersQueryCache::new(Arc::new(remote));
    cache.ensure_fresh().await.expect("initial read");
    cache.invalidate(CacheTag::Users);

    let error = cache.ensure_fresh().await.expect_err("refetch fails");

    assert_eq!(error.code(), ErrorCode::Decode);
    let snapshot = cache.snapshot();
    assert_eq!(names(&snapshot), ["Ada", "Grace"]);
    assert_eq!(snapshot.collection().status(), CollectionStatus::Error);
    assert!(cache.is_stale());
}

#[rstest]
#[tokio::test]
async fn consecutive_updates_build_on_each_other(two_users: Vec<User>) {
    let remote = Arc::new(InMemoryUsersRemote::with_users(two_users));
    let cache = UsersQueryCache::new(Arc::clone(&remote));
    let _subscription = cache.subscribe();
    cache.ensure_fresh().await.expect("initial read");

    let mut rename = UserPatch::default();
    rename.set("name", "Grace Hopper");
    cache
        .update(&UserId::Number(2), &rename)
        .await
        .expect("rename");
    let mut phone = UserPatch::default();
    phone.set("phone", "555-0100");
    cache
        .update(&UserId::Number(2), &phone)
        .await
        .expect("phone");

    let stored = remote
        .users()
        .into_iter()
        .find(|user| user.id == UserId::Number(2))
        .expect("user 2 stored");
    assert_eq!(stored.fields.name.as_deref(), Some("Grace Hopper"));
    assert_eq!(stored.fields.phone.as_deref(), Some("555-0100"));
}

#[rstest]
#[tokio::test]
async fn created_user_can_be_updated_without_readers(two_users: Vec<User>) {
    let remote = Arc::new(InMemoryUsersRemote::with_users(two_users));
    let cache = UsersQueryCache::new(Arc::clone(&remote));
    cache.ensure_fresh().await.expect("initial read");

    let mut draft = UserDraft::default();
    draft.set("name", "Barbara");
    let created = cache.create(&draft).await.expect("create");
    let mut patch = UserPatch::default();
    patch.set("name", "Barbara Liskov");
    let updated = cache
        .update(&created.id, &patch)
        .await
        .expect("update of the created user");

    assert_eq!(updated.fields.name.as_deref(), Some("Barbara Liskov"));
    assert_eq!(
        remote.users().last().and_then(|u| u.fields.name.clone()).as_deref(),
        Some("Barbara Liskov")
    );
}

#[rstest]
fn failure_from_an_older_fetch_keeps_newer_data(two_users: Vec<User>) {
    let cache = UsersQueryCache::new(Arc::new(MockUsersRemote::new()));
    cache.invalidate(CacheTag::Users);
    cache
        .apply(2, Ok(Arc::new(two_users)))
        .expect("newer data applies");

    let snapshot = cache
        .apply(1, Err(UsersRemoteError::network("connection reset")))
        .expect("older failure is ignored");

    assert_eq!(snapshot.data_generation(), 2);
    assert_eq!(names(&snapshot), ["Ada", "Grace"]);
    assert_eq!(snapshot.collection().status(), CollectionStatus::Idle);
    assert_eq!(snapshot.collection().last_error(), None);
}

#[rstest]
#[tokio::test]
async fn subscription_sees_each_change_until_the_cache_is_dropped(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    let cache = UsersQueryCache::new(Arc::new(remote));
    let mut subscription = cache.subscribe();

    cache.ensure_fresh().await.expect("initial read");
    let seen = subscription.changed().await.expect("cache alive");
    assert_eq!(seen.data_generation(), 1);
    assert_eq!(names(&seen), ["Ada", "Grace"]);

    drop(cache);
    assert_eq!(subscription.changed().await, None);
}

#[test]
fn dropping_a_subscription_unregisters_it() {
    let cache = UsersQueryCache::new(Arc::new(MockUsersRemote::new()));

    let first = cache.subscribe();
    let second = cache.subscribe();
    assert_eq!(cache.subscriber_count(), 2);

    drop(first);
    assert_eq!(cache.subscriber_count(), 1);
    drop(second);
    assert_eq!(cache.subscriber_count(), 0);
}

#[rstest]
#[tokio::test]
async fn store_port_settles_on_fresh_data(two_users: Vec<User>) {
    let mut remote = MockUsersRemote::new();
    remote
        .expect_list()
        .times(1)
        .return_once(move || Ok(two_users));
    let cache = UsersQueryCache::new(Arc::new(remote));
    let store: &dyn UsersStore = &cache;

    let settled = store.settled().await.expect("settles");

    assert_eq!(settled.records().len(), 2);
    assert_eq!(store.snapshot(), settled);
}
