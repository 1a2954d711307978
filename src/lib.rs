//! Short-lived, use-counted capability tokens that let a downstream service fetch one protected
//! resource on a user's behalf without ever seeing the user's credentials.
//!
//! The crate is organized around a single [`engine::TokenEngine`] facade:
//!
//! - [`engine::TokenEngine::issue_token`] mints a 256-bit hex token bound to a
//!   [`auth::ResourceTarget`] and an [`auth::Identity`], with a use budget.
//! - [`engine::TokenValidator::validate_token`] redeems a presented token, consuming one use and
//!   returning the bound identity or a [`engine::Verdict::Denied`].
//! - [`engine::TokenEngine::reap_expired_tokens`] purges rows that aged past the lifetime window.
//!
//! Persistence is pluggable through [`store::TokenStore`]; [`store::MemoryStore`] and
//! [`store::FileStore`] ship with the crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod obs;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credential, Identity, PrincipalId, ResourceTarget},
		engine::TokenEngine,
		store::{MemoryStore, TokenStore},
	};

	/// Builds an identity fixture for the provided principal.
	pub fn test_identity(principal: &str) -> Identity {
		let principal =
			PrincipalId::new(principal).expect("Principal fixture should be a valid identifier.");

		Identity::new(principal, "Test User", Credential::new("credential-hash"))
	}

	/// Builds a resource target fixture.
	pub fn test_target(resource: &str, sub_resource: &str) -> ResourceTarget {
		ResourceTarget::parse(resource, sub_resource)
			.expect("Resource target fixture should contain valid identifiers.")
	}

	/// Constructs a [`TokenEngine`] backed by an in-memory store using the default policy.
	pub fn build_test_engine() -> (TokenEngine, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();

		(TokenEngine::new(store), store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use color_eyre as _;
