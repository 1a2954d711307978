// self
use crate::{_prelude::*, obs::OpKind, store::StoreError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by engine operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("fetch_grant.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `warn` event for a store failure the engine absorbs instead of propagating.
///
/// Only the error text is recorded; store errors never carry token material.
pub fn log_absorbed_failure(kind: OpKind, stage: &'static str, err: &StoreError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(op = kind.as_str(), stage, error = %err, "store failure absorbed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage, err);
	}
}

/// Emits a `debug` event naming why a redemption was denied.
pub fn log_denial(reason: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(reason, "redemption denied");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Emits an `info` event with the number of rows a sweep removed.
pub fn log_reaped(removed: u64) {
	#[cfg(feature = "tracing")]
	{
		if removed > 0 {
			tracing::info!(removed, "expired tokens reaped");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = removed;
	}
}
