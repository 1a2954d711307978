//! Engine-level error types shared across issuance, validation, and stores.

// self
use crate::_prelude::*;

/// Engine-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical engine error exposed by public APIs.
///
/// A denied redemption is not an error; it is reported as
/// [`Verdict::Denied`](crate::engine::Verdict::Denied).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or input problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration and input validation failures raised by the engine.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A resource, sub-resource, or principal identifier is malformed.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
	/// A token must grant at least one redemption.
	#[error("Token use budget must be at least 1.")]
	ZeroUses,
	/// The token lifetime window must be strictly positive.
	#[error("Token lifetime must be positive, got {seconds} seconds.")]
	NonPositiveLifetime {
		/// Offending lifetime, in whole seconds.
		seconds: i64,
	},
}
