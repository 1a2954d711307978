#![cfg(feature = "tokio")]

// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use time::{Duration, OffsetDateTime};
// self
use fetch_grant::{
	auth::{Credential, Identity, PrincipalId, ResourceTarget},
	engine::{TokenEngine, spawn_reaper},
	store::{MemoryStore, TokenStore},
};

#[tokio::test]
async fn background_reaper_purges_expired_rows() {
	let backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = backend.clone();
	let engine = TokenEngine::new(store);
	let principal = PrincipalId::new("user-u").expect("Principal fixture should be valid.");
	let identity = Identity::new(principal, "User U", Credential::new("hash"));
	let target = ResourceTarget::parse("obj:1", "thumb").expect("Target fixture should be valid.");

	engine
		.issue_token_at(target, identity, 1, OffsetDateTime::now_utc() - Duration::hours(1))
		.await
		.expect("Issuing an already-expired fixture should succeed.");

	assert_eq!(backend.len(), 1);

	let handle = spawn_reaper(engine.clone(), StdDuration::from_millis(10));

	for _ in 0..100 {
		if backend.is_empty() {
			break;
		}

		tokio::time::sleep(StdDuration::from_millis(10)).await;
	}

	handle.abort();

	assert!(backend.is_empty(), "The background sweep should purge the expired row.");
	assert_eq!(engine.metrics.reaped(), 1);
}
