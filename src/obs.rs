//! Optional observability helpers for engine operations.
//!
//! # Feature Flags
//!
//! - `tracing` (default) emits structured spans named `fetch_grant.op` with the `op` and `stage`
//!   fields, plus `warn` events for store failures that the engine absorbs. Token values,
//!   credentials, and use counts are never recorded.
//! - `metrics` increments the `fetch_grant_op_total` counter for every attempt and outcome,
//!   labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Engine operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Token issuance.
	Issue,
	/// Token redemption.
	Validate,
	/// Expired-token sweep.
	Reap,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Issue => "issue",
			OpKind::Validate => "validate",
			OpKind::Reap => "reap",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an engine operation.
	Attempt,
	/// Successful completion (issue, reap).
	Success,
	/// Redemption granted.
	Granted,
	/// Redemption denied.
	Denied,
	/// Failure propagated back to the caller or absorbed and logged.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Granted => "granted",
			OpOutcome::Denied => "denied",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
