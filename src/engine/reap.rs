//! Expiry sweeps that purge tokens aged past the lifetime window, whatever their remaining uses.

// self
use crate::{
	_prelude::*,
	engine::TokenEngine,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

impl TokenEngine {
	/// Deletes every token issued before `now - lifetime` and returns how many were removed.
	///
	/// Store failures are logged and reported as zero removals so a scheduler running other
	/// jobs is never interrupted.
	pub async fn reap_expired_tokens(&self) -> u64 {
		self.reap_expired_tokens_at(OffsetDateTime::now_utc()).await
	}

	/// Runs a sweep as if the current instant were `now`.
	pub async fn reap_expired_tokens_at(&self, now: OffsetDateTime) -> u64 {
		const KIND: OpKind = OpKind::Reap;

		let span = OpSpan::new(KIND, "reap_expired_tokens");
		let cutoff = now - self.policy().lifetime();

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		match span.instrument(self.store.delete_issued_before(cutoff)).await {
			Ok(removed) => {
				self.metrics.record_reaped(removed);
				obs::log_reaped(removed);
				obs::record_op_outcome(KIND, OpOutcome::Success);

				removed
			},
			Err(err) => {
				self.metrics.record_store_failure();
				obs::log_absorbed_failure(KIND, "delete_issued_before", &err);
				obs::record_op_outcome(KIND, OpOutcome::Failure);

				0
			},
		}
	}
}

/// Runs [`TokenEngine::reap_expired_tokens`] every `period` on the current Tokio runtime.
///
/// The first sweep fires immediately. Abort the returned handle to stop the loop.
#[cfg(feature = "tokio")]
pub fn spawn_reaper(
	engine: TokenEngine,
	period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(period);

		loop {
			interval.tick().await;
			engine.reap_expired_tokens().await;
		}
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::_preludet;

	#[tokio::test]
	async fn sweep_counts_removed_rows() {
		let (engine, store) = _preludet::build_test_engine();
		let now = macros::datetime!(2025-05-05 10:00 UTC);

		for offset in [301, 600, 10] {
			engine
				.issue_token_at(
					_preludet::test_target("obj:1", "thumb"),
					_preludet::test_identity("alice"),
					2,
					now - Duration::seconds(offset),
				)
				.await
				.expect("Fixture issuance should succeed.");
		}

		assert_eq!(engine.reap_expired_tokens_at(now).await, 2);
		assert_eq!(store.len(), 1);
		assert_eq!(engine.metrics.reaped(), 2);
		assert_eq!(engine.reap_expired_tokens_at(now).await, 0);
	}
}
