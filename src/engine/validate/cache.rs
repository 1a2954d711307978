// self
use crate::{_prelude::*, engine::Verdict, store::TokenKey};

/// Verdicts memoized for the lifetime of one [`TokenValidator`](crate::engine::TokenValidator).
///
/// Never shared across requests; a triple resolved here keeps its verdict even after the
/// underlying row is consumed or reaped.
#[derive(Default)]
pub struct ValidationCache(Mutex<HashMap<TokenKey, Verdict>>);
impl ValidationCache {
	/// Returns the cached verdict for `key`, if any.
	pub fn get(&self, key: &TokenKey) -> Option<Verdict> {
		self.0.lock().get(key).cloned()
	}

	/// Number of memoized triples.
	pub fn len(&self) -> usize {
		self.0.lock().len()
	}

	/// Returns `true` if nothing has been memoized yet.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}

	/// Memoizes `verdict` unless a verdict for `key` is already present, and returns the one
	/// that is kept.
	pub(crate) fn insert(&self, key: TokenKey, verdict: Verdict) -> Verdict {
		self.0.lock().entry(key).or_insert(verdict).clone()
	}
}
impl Debug for ValidationCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ValidationCache").field("entries", &self.len()).finish()
	}
}
