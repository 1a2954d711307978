//! Token lifecycle engine: issuance, redemption, and expiry sweeps over a [`TokenStore`].

pub mod issue;
pub mod reap;
pub mod validate;

mod metrics;

pub use metrics::EngineMetrics;
#[cfg(feature = "tokio")] pub use reap::spawn_reaper;
pub use validate::*;

// self
use crate::{_prelude::*, config::TokenPolicy, error::ConfigError, store::TokenStore};

/// Coordinates issuance, validation, and reaping against a single token store.
///
/// The engine is cheap to clone; every clone shares the store and metrics. Validation verdicts
/// are memoized per [`TokenValidator`], never on the engine itself, so a long-lived engine
/// carries no per-request state.
#[derive(Clone)]
pub struct TokenEngine {
	/// Token store implementation that persists outstanding grants.
	pub store: Arc<dyn TokenStore>,
	/// Shared counters for issued, granted, denied, and reaped tokens.
	pub metrics: Arc<EngineMetrics>,
	policy: TokenPolicy,
}
impl TokenEngine {
	/// Creates an engine over `store` using [`TokenPolicy::default`].
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self { store, metrics: Default::default(), policy: TokenPolicy::default() }
	}

	/// Replaces the policy after validating it.
	pub fn with_policy(mut self, policy: TokenPolicy) -> Result<Self, ConfigError> {
		policy.validate()?;

		self.policy = policy;

		Ok(self)
	}

	/// Active lifetime and use-budget policy.
	pub fn policy(&self) -> &TokenPolicy {
		&self.policy
	}

	/// Opens a redemption context with an empty verdict cache.
	///
	/// Create one per inbound request (or per batch that should share verdicts) and drop it
	/// when the request ends.
	pub fn validator(&self) -> TokenValidator {
		TokenValidator::new(self.clone())
	}
}
impl Debug for TokenEngine {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEngine")
			.field("policy", &self.policy)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet, error::ConfigError};

	#[test]
	fn with_policy_rejects_invalid_values() {
		let (engine, _) = _preludet::build_test_engine();
		let err = engine
			.with_policy(TokenPolicy::default().with_lifetime(Duration::seconds(-1)))
			.expect_err("Negative lifetime must be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveLifetime { seconds: -1 }));
	}

	#[test]
	fn with_policy_applies_valid_values() {
		let (engine, _) = _preludet::build_test_engine();
		let engine = engine
			.with_policy(TokenPolicy::default().with_default_uses(4))
			.expect("Valid policy should apply.");

		assert_eq!(engine.policy().default_uses, 4);
	}
}
