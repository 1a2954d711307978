// std
use std::num::NonZeroU32;
// crates.io
use time::{Duration, OffsetDateTime, macros};
// self
use fetch_grant::{
	auth::{Credential, Identity, PrincipalId, ResourceTarget, TokenRecord},
	store::{ConsumeOutcome, FreshnessWindow, MemoryStore, StoreError, TokenKey, TokenStore},
};

const ISSUED: OffsetDateTime = macros::datetime!(2025-11-10 12:00 UTC);

fn make_target(sub_resource: &str) -> ResourceTarget {
	ResourceTarget::parse("obj:1", sub_resource)
		.expect("Failed to build resource target for memory store tests.")
}

fn make_identity() -> Identity {
	let principal = PrincipalId::new("principal-456")
		.expect("Failed to build principal identifier for memory store tests.");

	Identity::new(principal, "Principal 456", Credential::new("hash-456"))
}

fn build_record(sub_resource: &str, issued_at: OffsetDateTime, uses: u32) -> TokenRecord {
	TokenRecord::builder(make_target(sub_resource), make_identity())
		.issued_at(issued_at)
		.uses(uses)
		.build()
		.expect("Token record fixture should build successfully.")
}

fn window_at(now: OffsetDateTime) -> FreshnessWindow {
	FreshnessWindow::ending_at(now, Duration::seconds(300))
}

fn uses(value: u32) -> NonZeroU32 {
	NonZeroU32::new(value).expect("Use fixture should be non-zero.")
}

#[tokio::test]
async fn insert_and_find_round_trip() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 1);
	let key = TokenKey::for_record(&record);

	store.insert(record.clone()).await.expect("Inserting record fixture should succeed.");

	let fetched = store
		.find(&key, window_at(ISSUED + Duration::seconds(1)))
		.await
		.expect("Finding token record in memory store should succeed.")
		.expect("Stored record should be inside the window.");

	assert_eq!(fetched, record);
}

#[tokio::test]
async fn find_honors_the_window_bounds() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 1);
	let key = TokenKey::for_record(&record);

	store.insert(record).await.expect("Inserting record fixture should succeed.");

	let at = |offset: i64| window_at(ISSUED + Duration::seconds(offset));

	assert!(store.find(&key, at(0)).await.expect("Lookup should succeed.").is_some());
	assert!(store.find(&key, at(299)).await.expect("Lookup should succeed.").is_some());
	assert!(store.find(&key, at(300)).await.expect("Lookup should succeed.").is_none());
	assert!(store.find(&key, at(-1)).await.expect("Lookup should succeed.").is_none());
}

#[tokio::test]
async fn find_is_scoped_to_the_target() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 1);
	let foreign = TokenKey::new(make_target("full"), record.token.clone());

	store.insert(record).await.expect("Inserting record fixture should succeed.");

	let fetched =
		store.find(&foreign, window_at(ISSUED)).await.expect("Lookup should succeed.");

	assert!(fetched.is_none());
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 1);

	store.insert(record.clone()).await.expect("First insert should succeed.");

	let err = store.insert(record).await.expect_err("Duplicate insert must fail.");

	assert!(matches!(err, StoreError::Conflict { .. }));
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn update_and_delete_tolerate_missing_rows() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 3);
	let key = TokenKey::for_record(&record);

	store.update_remaining_uses(&key, uses(2)).await.expect("Updating a missing row is a no-op.");
	store.delete(&key).await.expect("Deleting a missing row is a no-op.");
	assert!(store.is_empty());

	store.insert(record).await.expect("Inserting record fixture should succeed.");
	store.update_remaining_uses(&key, uses(2)).await.expect("Updating uses should succeed.");

	assert_eq!(store.get(&key).map(|record| record.remaining_uses.get()), Some(2));

	store.delete(&key).await.expect("Deleting an existing row should succeed.");
	store.delete(&key).await.expect("Double delete should be harmless.");

	assert!(store.get(&key).is_none());
}

#[tokio::test]
async fn delete_issued_before_is_strict() {
	let store = MemoryStore::default();
	let cutoff = ISSUED;

	for (sub, offset) in [("a", -10), ("b", -1), ("c", 0), ("d", 5)] {
		store
			.insert(build_record(sub, cutoff + Duration::seconds(offset), 2))
			.await
			.expect("Inserting sweep fixture should succeed.");
	}

	let removed =
		store.delete_issued_before(cutoff).await.expect("Range delete should succeed.");

	assert_eq!(removed, 2);
	assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn consume_use_decrements_then_deletes() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 2);
	let key = TokenKey::for_record(&record);

	store.insert(record).await.expect("Inserting record fixture should succeed.");

	let first = store.consume_use(&key, uses(2)).await.expect("First consume should succeed.");

	assert_eq!(first, ConsumeOutcome::Decremented { remaining: uses(1) });

	let stale = store.consume_use(&key, uses(2)).await.expect("Stale consume should resolve.");

	assert_eq!(stale, ConsumeOutcome::Conflict);

	let last = store.consume_use(&key, uses(1)).await.expect("Final consume should succeed.");

	assert_eq!(last, ConsumeOutcome::Exhausted);
	assert!(store.is_empty());

	let gone = store.consume_use(&key, uses(1)).await.expect("Missing consume should resolve.");

	assert_eq!(gone, ConsumeOutcome::Missing);
}

#[tokio::test]
async fn concurrent_consume_allows_single_winner() {
	let store = MemoryStore::default();
	let record = build_record("thumb", ISSUED, 1);
	let key = TokenKey::for_record(&record);

	store.insert(record).await.expect("Inserting record fixture should succeed.");

	let store_a = store.clone();
	let store_b = store.clone();
	let key_a = key.clone();
	let key_b = key;
	let task_a = tokio::spawn(async move {
		store_a.consume_use(&key_a, uses(1)).await.expect("Consume task A should complete.")
	});
	let task_b = tokio::spawn(async move {
		store_b.consume_use(&key_b, uses(1)).await.expect("Consume task B should complete.")
	});
	let (outcome_a, outcome_b) = tokio::join!(task_a, task_b);
	let outcomes = [
		outcome_a.expect("Consume task A should not panic."),
		outcome_b.expect("Consume task B should not panic."),
	];
	let spent = outcomes.iter().filter(|outcome| outcome.is_spent()).count();

	assert_eq!(spent, 1, "only one redeemer may spend a single-use token");
	assert!(outcomes.contains(&ConsumeOutcome::Missing));
	assert!(store.is_empty());
}
