//! Storage contracts and built-in store implementations for outstanding token records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ResourceTarget, TokenRecord},
};

/// Boxed future returned by every [`TokenStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by token stores.
///
/// Rows are addressed by [`TokenKey`] (target + token). Implementations never hold a record
/// with zero remaining uses; exhaustion is expressed by deleting the row.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists a new record; fails with [`StoreError::Conflict`] if the key is taken.
	fn insert(&self, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record for `key` if its `issued_at` lies inside `window`.
	fn find<'a>(
		&'a self,
		key: &'a TokenKey,
		window: FreshnessWindow,
	) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Overwrites the remaining-use counter. Missing rows are left alone.
	fn update_remaining_uses<'a>(
		&'a self,
		key: &'a TokenKey,
		remaining: NonZeroU32,
	) -> StoreFuture<'a, ()>;

	/// Removes the row for `key`. Missing rows are left alone.
	fn delete<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, ()>;

	/// Removes every row issued strictly before `cutoff` and returns how many were removed.
	fn delete_issued_before(&self, cutoff: OffsetDateTime) -> StoreFuture<'_, u64>;

	/// Spends one use of the row for `key`, expecting it to hold `expected` remaining uses.
	///
	/// The default implementation is a best-effort read-decrement-write built from
	/// [`update_remaining_uses`](Self::update_remaining_uses) and [`delete`](Self::delete): it
	/// trusts `expected` and never reports [`ConsumeOutcome::Conflict`] or
	/// [`ConsumeOutcome::Missing`], so concurrent redeemers may over- or under-count.
	/// Backends with an atomic conditional update should override it.
	fn consume_use<'a>(
		&'a self,
		key: &'a TokenKey,
		expected: NonZeroU32,
	) -> StoreFuture<'a, ConsumeOutcome> {
		Box::pin(async move {
			match NonZeroU32::new(expected.get() - 1) {
				Some(remaining) => {
					self.update_remaining_uses(key, remaining).await?;

					Ok(ConsumeOutcome::Decremented { remaining })
				},
				None => {
					self.delete(key).await?;

					Ok(ConsumeOutcome::Exhausted)
				},
			}
		})
	}
}

/// Result of spending one use via [`TokenStore::consume_use`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeOutcome {
	/// The counter was decremented and the row stays redeemable.
	Decremented {
		/// Uses left after this redemption.
		remaining: NonZeroU32,
	},
	/// That was the last use; the row has been deleted.
	Exhausted,
	/// The row exists but its counter no longer matches the expected value.
	Conflict,
	/// No row matched the key.
	Missing,
}
impl ConsumeOutcome {
	/// Returns `true` if this call spent a use.
	pub fn is_spent(self) -> bool {
		matches!(self, Self::Decremented { .. } | Self::Exhausted)
	}

	pub(crate) fn spend(record: &TokenRecord, expected: NonZeroU32) -> (Self, Option<NonZeroU32>) {
		if record.remaining_uses != expected {
			return (Self::Conflict, Some(record.remaining_uses));
		}

		match record.uses_after_redemption() {
			Some(remaining) => (Self::Decremented { remaining }, Some(remaining)),
			None => (Self::Exhausted, None),
		}
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Constraint violation, e.g. inserting a key that already exists.
	#[error("Constraint violation: {message}.")]
	Conflict {
		/// Human-readable error payload; never contains token material.
		message: String,
	},
}

/// Redemption key identifying a stored token record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenKey {
	/// Resource + sub-resource component.
	pub target: ResourceTarget,
	/// Bearer token component.
	pub token: AccessToken,
}
impl TokenKey {
	/// Builds a key from its parts.
	pub fn new(target: ResourceTarget, token: AccessToken) -> Self {
		Self { target, token }
	}

	/// Builds the key under which `record` is stored.
	pub fn for_record(record: &TokenRecord) -> Self {
		Self::new(record.target.clone(), record.token.clone())
	}
}

/// Half-open `(not_before, not_after]` range of acceptable `issued_at` instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreshnessWindow {
	/// Exclusive lower bound.
	pub not_before: OffsetDateTime,
	/// Inclusive upper bound.
	pub not_after: OffsetDateTime,
}
impl FreshnessWindow {
	/// Window of records still redeemable at `now` under `lifetime`.
	pub fn ending_at(now: OffsetDateTime, lifetime: Duration) -> Self {
		Self { not_before: now - lifetime, not_after: now }
	}

	/// Returns `true` if `issued_at` falls inside the window.
	pub fn contains(&self, issued_at: OffsetDateTime) -> bool {
		self.not_before < issued_at && issued_at <= self.not_after
	}
}
