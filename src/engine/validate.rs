//! Token redemption with per-context verdict caching.
//!
//! A [`TokenValidator`] resolves each `(resource, sub-resource, token)` triple at most once:
//! the first call looks the row up inside the freshness window `(now - lifetime, now]`, spends
//! one use through [`TokenStore::consume_use`], and caches the verdict; later calls for the
//! same triple return the cached verdict without touching the store, even after the row has
//! been consumed.
//!
//! Failure handling:
//!
//! - A store failure while reading propagates as [`Error::Storage`] and is not cached. No
//!   identity is released, and the caller can tell an outage from a denial.
//! - A store failure while spending the use is logged and the redemption stays granted; the
//!   row was found fresh at decision time.

mod cache;

pub use cache::ValidationCache;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Identity, ResourceTarget},
	engine::TokenEngine,
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::{ConsumeOutcome, FreshnessWindow, TokenKey},
};

const KIND: OpKind = OpKind::Validate;
/// Lookups retried when a concurrent redeemer changes the use counter under us.
const MAX_CONSUME_ATTEMPTS: usize = 3;

/// Outcome of a redemption attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
	/// The token was valid; the fetch may proceed on behalf of this identity.
	Granted(Identity),
	/// Unknown token, wrong target, expired, or exhausted.
	Denied,
}
impl Verdict {
	/// Returns `true` for [`Verdict::Granted`].
	pub fn is_granted(&self) -> bool {
		matches!(self, Self::Granted(_))
	}

	/// Borrows the granted identity, if any.
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			Self::Granted(identity) => Some(identity),
			Self::Denied => None,
		}
	}

	/// Consumes the verdict and returns the granted identity, if any.
	pub fn into_identity(self) -> Option<Identity> {
		match self {
			Self::Granted(identity) => Some(identity),
			Self::Denied => None,
		}
	}
}

/// Request-scoped redemption context obtained from [`TokenEngine::validator`].
///
/// Owns a [`ValidationCache`]; dropping the validator discards every memoized verdict.
///
/// Meant to be driven by one task at a time. Concurrent calls for the same triple may each
/// reach the store and spend a use, but all of them report the first verdict memoized.
#[derive(Debug)]
pub struct TokenValidator {
	engine: TokenEngine,
	cache: ValidationCache,
}
impl TokenValidator {
	/// Creates a validator with an empty cache.
	pub fn new(engine: TokenEngine) -> Self {
		Self { engine, cache: ValidationCache::default() }
	}

	/// Verdicts memoized by this context.
	pub fn cache(&self) -> &ValidationCache {
		&self.cache
	}

	/// Redeems `token` for the `(resource, sub_resource)` pair at the current instant.
	pub async fn validate_token(
		&self,
		resource: &str,
		sub_resource: &str,
		token: &str,
	) -> Result<Verdict> {
		self.validate_token_at(resource, sub_resource, token, OffsetDateTime::now_utc()).await
	}

	/// Redeems `token` as if the current instant were `now`.
	pub async fn validate_token_at(
		&self,
		resource: &str,
		sub_resource: &str,
		token: &str,
		now: OffsetDateTime,
	) -> Result<Verdict> {
		let Some(key) = parse_key(resource, sub_resource, token) else {
			obs::log_denial("malformed");
			self.record_verdict(&Verdict::Denied);

			return Ok(Verdict::Denied);
		};

		self.validate_key_at(key, now).await
	}

	/// Redeems an already-parsed key as if the current instant were `now`.
	pub async fn validate_key_at(&self, key: TokenKey, now: OffsetDateTime) -> Result<Verdict> {
		if let Some(verdict) = self.cache.get(&key) {
			self.engine.metrics.record_cache_hit();

			return Ok(verdict);
		}

		let span = OpSpan::new(KIND, "validate_token");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let verdict = match span.instrument(self.redeem(&key, now)).await {
			Ok(verdict) => verdict,
			Err(err) => {
				self.engine.metrics.record_store_failure();
				obs::record_op_outcome(KIND, OpOutcome::Failure);

				return Err(err);
			},
		};

		let verdict = self.cache.insert(key, verdict);

		self.record_verdict(&verdict);

		Ok(verdict)
	}

	async fn redeem(&self, key: &TokenKey, now: OffsetDateTime) -> Result<Verdict> {
		let store = self.engine.store.as_ref();
		let window = FreshnessWindow::ending_at(now, self.engine.policy().lifetime());

		for _ in 0..MAX_CONSUME_ATTEMPTS {
			let Some(record) = store.find(key, window).await? else {
				obs::log_denial("not_found");

				return Ok(Verdict::Denied);
			};

			match store.consume_use(key, record.remaining_uses).await {
				Ok(ConsumeOutcome::Decremented { .. } | ConsumeOutcome::Exhausted) =>
					return Ok(Verdict::Granted(record.identity)),
				Ok(ConsumeOutcome::Conflict) => continue,
				Ok(ConsumeOutcome::Missing) => {
					obs::log_denial("consumed_concurrently");

					return Ok(Verdict::Denied);
				},
				Err(err) => {
					self.engine.metrics.record_store_failure();
					obs::log_absorbed_failure(KIND, "consume_use", &err);

					return Ok(Verdict::Granted(record.identity));
				},
			}
		}

		obs::log_denial("contended");

		Ok(Verdict::Denied)
	}

	fn record_verdict(&self, verdict: &Verdict) {
		if verdict.is_granted() {
			self.engine.metrics.record_granted();
			obs::record_op_outcome(KIND, OpOutcome::Granted);
		} else {
			self.engine.metrics.record_denied();
			obs::record_op_outcome(KIND, OpOutcome::Denied);
		}
	}
}

fn parse_key(resource: &str, sub_resource: &str, token: &str) -> Option<TokenKey> {
	let target = ResourceTarget::parse(resource, sub_resource).ok()?;
	let token = AccessToken::new(token);

	token.is_well_formed().then(|| TokenKey::new(target, token))
}
