//! File-backed [`TokenStore`] that survives restarts of a single-node deployment.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	store::{
		ConsumeOutcome, FreshnessWindow, MemoryStore, StoreError, StoreFuture, TokenKey,
		TokenStore, memory::RecordMap,
	},
};

/// Persists token records to a JSON file after each mutation.
///
/// The snapshot holds bearer tokens in clear text; place it on a path readable only by the
/// service account.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<RecordMap>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the JSON snapshot.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<RecordMap, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let records: Vec<TokenRecord> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(records.into_iter().map(|record| (TokenKey::for_record(&record), record)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `mutate` to a staged copy of the map and publishes it only after the snapshot
	/// reaches disk, so a failed write leaves memory and file in agreement.
	///
	/// `mutate` returns its value plus whether the map changed.
	fn commit<T>(
		&self,
		mutate: impl FnOnce(&mut RecordMap) -> Result<(T, bool), StoreError>,
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut staged = guard.clone();
		let (value, changed) = mutate(&mut staged)?;

		if changed {
			self.persist_locked(&staged)?;

			*guard = staged;
		}

		Ok(value)
	}

	fn persist_locked(&self, contents: &RecordMap) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot: Vec<_> = contents.values().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let tmp_path = self.path.with_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn insert(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.commit(|map| MemoryStore::insert_into(map, record).map(|()| ((), true)))
		})
	}

	fn find<'a>(
		&'a self,
		key: &'a TokenKey,
		window: FreshnessWindow,
	) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Ok(MemoryStore::find_in(&self.inner.read(), key, window)) })
	}

	fn update_remaining_uses<'a>(
		&'a self,
		key: &'a TokenKey,
		remaining: NonZeroU32,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.commit(|map| Ok(((), MemoryStore::update_in(map, key, remaining))))
		})
	}

	fn delete<'a>(&'a self, key: &'a TokenKey) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.commit(|map| Ok(((), map.remove(key).is_some()))) })
	}

	fn delete_issued_before(&self, cutoff: OffsetDateTime) -> StoreFuture<'_, u64> {
		Box::pin(async move {
			self.commit(|map| {
				let removed = MemoryStore::delete_before_in(map, cutoff);

				Ok((removed, removed > 0))
			})
		})
	}

	fn consume_use<'a>(
		&'a self,
		key: &'a TokenKey,
		expected: NonZeroU32,
	) -> StoreFuture<'a, ConsumeOutcome> {
		Box::pin(async move {
			self.commit(|map| Ok(MemoryStore::consume_in(map, key, expected)))
		})
	}
}
