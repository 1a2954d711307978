//! Thread-safe in-memory [`TokenStore`] implementation for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	store::{ConsumeOutcome, FreshnessWindow, StoreError, StoreFuture, TokenKey, TokenStore},
};

pub(crate) type RecordMap = HashMap<TokenKey, TokenRecord>;

type StoreMap = Arc<RwLock<RecordMap>>;

/// Thread-safe storage backend that keeps records in-process.
///
/// Clones share the same map, so a clone handed to the engine and one kept by a test observe
/// the same rows.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of outstanding records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if no records are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns the record for `key` regardless of its age.
	pub fn get(&self, key: &TokenKey) -> Option<TokenRecord> {
		self.0.read().get(key).cloned()
	}

	pub(crate) fn insert_into(map: &mut RecordMap, record: TokenRecord) -> Result<(), StoreError> {
		let key = TokenKey::for_record(&record);

		if map.contains_key(&key) {
			return Err(StoreError::Conflict {
				message: format!("A token for {} already exists", key.target),
			});
		}

		map.insert(key, record);

		Ok(())
	}

	pub(crate) fn find_in(
		map: &RecordMap,
		key: &TokenKey,
		window: FreshnessWindow,
	) -> Option<TokenRecord> {
		map.get(key).filter(|record| window.contains(record.issued_at)).cloned()
	}

	/// Returns `true` if the map changed.
	pub(crate) fn update_in(map: &mut RecordMap, key: &TokenKey, remaining: NonZeroU32) -> bool {
		match map.get_mut(key) {
			Some(record) => {
				record.remaining_uses = remaining;

				true
			},
			None => false,
		}
	}

	pub(crate) fn delete_before_in(map: &mut RecordMap, cutoff: OffsetDateTime) -> u64 {
		let before = map.len();

		map.retain(|_, record| record.issued_at >= cutoff);

		(before - map.len()) as u64
	}

	/// Returns the outcome and whether the map changed.
	pub(crate) fn consume_in(
		map: &mut RecordMap,
		key: &TokenKey,
		expected: NonZeroU32,
	) -> (ConsumeOutcome, bool) {
		let Some(record) = map.get_mut(key) else {
			return (ConsumeOutcome::Missing, false);
		};
		let (outcome, remaining) = ConsumeOutcome::spend(record, expected);

		match (outcome, remaining) {
			(ConsumeOutcome::Decremented { .. }, Some(remaining)) => {
				record.remaining_uses = remaining;

				(outcome, true)
			},
			(ConsumeOutcome::Exhausted, _) => {
				map.remove(key);

				(outcome, true)
			},
			_ => (outcome, false),
		}
	}
}
impl TokenStore for MemoryStore {
	fn insert(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::insert_into(&mut map.write(), record) })
	}

	fn find<'a>(
		&'a self,
		key: &'a TokenKey,
		window: FreshnessWindow,
	) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Ok(Self::find_in(&self.0.read(), key, window)) })
	}

	fn update_remaining_uses<'a>(
		&'a self,
		key: &'a TokenKey,
		remaining: NonZeroU32,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			Self::update_in(&mut self.0.write(), key, remaining);

			Ok(())
		})
	}

	fn delete<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.0.write().remove(key);

			Ok(())
		})
	}

	fn delete_issued_before(&self, cutoff: OffsetDateTime) -> StoreFuture<'_, u64> {
		Box::pin(async move { Ok(Self::delete_before_in(&mut self.0.write(), cutoff)) })
	}

	fn consume_use<'a>(
		&'a self,
		key: &'a TokenKey,
		expected: NonZeroU32,
	) -> StoreFuture<'a, ConsumeOutcome> {
		Box::pin(async move { Ok(Self::consume_in(&mut self.0.write(), key, expected).0) })
	}
}
