//! Persisted token records and their builder.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Identity, ResourceTarget},
};

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when the use budget is zero.
	#[error("Use budget must be at least 1.")]
	ZeroUses,
}

/// Outstanding grant persisted by a [`TokenStore`](crate::store::TokenStore).
///
/// `remaining_uses` is non-zero by construction; exhausted records are deleted, never stored
/// with a zero count.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenRecord {
	/// Bearer token; callers must avoid logging it.
	pub token: AccessToken,
	/// Principal the token was issued for.
	pub identity: Identity,
	/// Resource + sub-resource the token is scoped to.
	pub target: ResourceTarget,
	/// Creation instant, truncated to whole seconds.
	pub issued_at: OffsetDateTime,
	/// Redemptions left before the record is consumed.
	pub remaining_uses: NonZeroU32,
}
impl TokenRecord {
	/// Returns a builder for a record bound to the provided target and identity.
	pub fn builder(target: ResourceTarget, identity: Identity) -> TokenRecordBuilder {
		TokenRecordBuilder::new(target, identity)
	}

	/// Remaining uses after one redemption; `None` once the budget is spent.
	pub fn uses_after_redemption(&self) -> Option<NonZeroU32> {
		NonZeroU32::new(self.remaining_uses.get() - 1)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("token", &"<redacted>")
			.field("principal", &self.identity.principal)
			.field("target", &self.target)
			.field("issued_at", &self.issued_at)
			.finish_non_exhaustive()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug)]
pub struct TokenRecordBuilder {
	target: ResourceTarget,
	identity: Identity,
	token: Option<AccessToken>,
	issued_at: Option<OffsetDateTime>,
	uses: u32,
}
impl TokenRecordBuilder {
	fn new(target: ResourceTarget, identity: Identity) -> Self {
		Self { target, identity, token: None, issued_at: None, uses: 1 }
	}

	/// Uses a caller-provided token instead of generating a fresh one.
	pub fn token(mut self, token: AccessToken) -> Self {
		self.token = Some(token);

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets the use budget (defaults to 1).
	pub fn uses(mut self, uses: u32) -> Self {
		self.uses = uses;

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let remaining_uses = NonZeroU32::new(self.uses).ok_or(TokenRecordBuilderError::ZeroUses)?;
		let issued_at = truncate_to_second(self.issued_at.unwrap_or_else(OffsetDateTime::now_utc));

		Ok(TokenRecord {
			token: self.token.unwrap_or_else(AccessToken::generate),
			identity: self.identity,
			target: self.target,
			issued_at,
			remaining_uses,
		})
	}
}

fn truncate_to_second(instant: OffsetDateTime) -> OffsetDateTime {
	instant - Duration::nanoseconds(i64::from(instant.nanosecond()))
}
