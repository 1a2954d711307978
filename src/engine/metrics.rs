// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for engine operations.
#[derive(Debug, Default)]
pub struct EngineMetrics {
	issued: AtomicU64,
	granted: AtomicU64,
	denied: AtomicU64,
	cache_hits: AtomicU64,
	reaped: AtomicU64,
	store_failures: AtomicU64,
}
impl EngineMetrics {
	/// Returns the number of tokens persisted by the issuer.
	pub fn issued(&self) -> u64 {
		self.issued.load(Ordering::Relaxed)
	}

	/// Returns the number of redemptions resolved as granted (cache hits excluded).
	pub fn granted(&self) -> u64 {
		self.granted.load(Ordering::Relaxed)
	}

	/// Returns the number of redemptions resolved as denied (cache hits excluded).
	pub fn denied(&self) -> u64 {
		self.denied.load(Ordering::Relaxed)
	}

	/// Returns the number of validations answered from a validator cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of rows removed by expiry sweeps.
	pub fn reaped(&self) -> u64 {
		self.reaped.load(Ordering::Relaxed)
	}

	/// Returns the number of store failures observed, propagated or absorbed.
	pub fn store_failures(&self) -> u64 {
		self.store_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_issued(&self) {
		self.issued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_granted(&self) {
		self.granted.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_denied(&self) {
		self.denied.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reaped(&self, removed: u64) {
		self.reaped.fetch_add(removed, Ordering::Relaxed);
	}

	pub(crate) fn record_store_failure(&self) {
		self.store_failures.fetch_add(1, Ordering::Relaxed);
	}
}
