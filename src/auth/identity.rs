//! The principal a token is issued for and released to on redemption.

// self
use crate::{
	_prelude::*,
	auth::{Credential, PrincipalId},
};

/// Principal fields bound to a token and handed back on a granted redemption.
///
/// Resolved by the caller's own session layer; the engine never reads ambient user state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Stable principal identifier.
	pub principal: PrincipalId,
	/// Human-readable display name.
	pub display_name: String,
	/// Opaque credential the downstream service needs to act as the principal.
	pub credential: Credential,
}
impl Identity {
	/// Creates an identity from its parts.
	pub fn new(
		principal: PrincipalId,
		display_name: impl Into<String>,
		credential: Credential,
	) -> Self {
		Self { principal, display_name: display_name.into(), credential }
	}
}
