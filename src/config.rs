//! Token lifetime and use-budget policy.

// self
use crate::{_prelude::*, error::ConfigError};

/// Tunables applied by [`TokenEngine`](crate::engine::TokenEngine).
///
/// Deserializable so deployments can load it from their own configuration files:
///
/// ```json
/// { "lifetime_secs": 300, "default_uses": 1 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPolicy {
	/// Seconds after issuance during which a token may be redeemed.
	pub lifetime_secs: i64,
	/// Use budget applied by [`TokenEngine::issue_token`](crate::engine::TokenEngine::issue_token).
	pub default_uses: u32,
}
impl TokenPolicy {
	/// Lifetime window applied when none is configured.
	pub const DEFAULT_LIFETIME: Duration = Duration::seconds(300);

	/// Overrides the lifetime window (truncated to whole seconds).
	pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
		self.lifetime_secs = lifetime.whole_seconds();

		self
	}

	/// Overrides the default use budget.
	pub fn with_default_uses(mut self, uses: u32) -> Self {
		self.default_uses = uses;

		self
	}

	/// Lifetime window as a [`Duration`].
	pub fn lifetime(&self) -> Duration {
		Duration::seconds(self.lifetime_secs)
	}

	/// Checks that the lifetime is positive and the default budget non-zero.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.lifetime_secs <= 0 {
			return Err(ConfigError::NonPositiveLifetime { seconds: self.lifetime_secs });
		}
		if self.default_uses == 0 {
			return Err(ConfigError::ZeroUses);
		}

		Ok(())
	}
}
impl Default for TokenPolicy {
	fn default() -> Self {
		Self { lifetime_secs: Self::DEFAULT_LIFETIME.whole_seconds(), default_uses: 1 }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_reference_policy() {
		let policy = TokenPolicy::default();

		assert_eq!(policy.lifetime(), Duration::seconds(300));
		assert_eq!(policy.default_uses, 1);
		policy.validate().expect("Default policy should be valid.");
	}

	#[test]
	fn partial_documents_fall_back_to_defaults() {
		let policy: TokenPolicy = serde_json::from_str(r#"{ "lifetime_secs": 60 }"#)
			.expect("Partial policy document should deserialize.");

		assert_eq!(policy, TokenPolicy::default().with_lifetime(Duration::minutes(1)));
	}

	#[test]
	fn validation_rejects_degenerate_values() {
		assert!(matches!(
			TokenPolicy::default().with_lifetime(Duration::ZERO).validate(),
			Err(ConfigError::NonPositiveLifetime { seconds: 0 })
		));
		assert!(matches!(
			TokenPolicy::default().with_default_uses(0).validate(),
			Err(ConfigError::ZeroUses)
		));
	}
}
