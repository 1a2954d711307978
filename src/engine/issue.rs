//! Token issuance.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Identity, ResourceTarget, TokenRecord},
	engine::TokenEngine,
	error::ConfigError,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

impl TokenEngine {
	/// Issues a token for `target` on behalf of `identity` using the policy's default budget.
	pub async fn issue_token(
		&self,
		target: ResourceTarget,
		identity: Identity,
	) -> Result<AccessToken> {
		self.issue_token_with_uses(target, identity, self.policy().default_uses).await
	}

	/// Issues a token redeemable up to `uses` times.
	///
	/// Multi-use budgets serve downstream protocols that fetch the same resource in several
	/// calls.
	pub async fn issue_token_with_uses(
		&self,
		target: ResourceTarget,
		identity: Identity,
		uses: u32,
	) -> Result<AccessToken> {
		self.issue_token_at(target, identity, uses, OffsetDateTime::now_utc()).await
	}

	/// Issues a token stamped with `now` as its issued-at instant.
	///
	/// The token is 256 bits of CSPRNG output rendered as lowercase hex. No uniqueness probe is
	/// made; a colliding insert surfaces as [`StoreError::Conflict`](crate::store::StoreError).
	pub async fn issue_token_at(
		&self,
		target: ResourceTarget,
		identity: Identity,
		uses: u32,
		now: OffsetDateTime,
	) -> Result<AccessToken> {
		const KIND: OpKind = OpKind::Issue;

		let span = OpSpan::new(KIND, "issue_token");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let record = TokenRecord::builder(target, identity)
					.uses(uses)
					.issued_at(now)
					.build()
					.map_err(|err| Error::from(ConfigError::from(err)))?;
				let token = record.token.clone();

				self.store.insert(record).await.map_err(|err| {
					self.metrics.record_store_failure();

					Error::from(err)
				})?;

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => {
				self.metrics.record_issued();
				obs::record_op_outcome(KIND, OpOutcome::Success);
			},
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}
