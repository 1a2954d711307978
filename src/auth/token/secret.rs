//! Redacted secret wrappers for bearer tokens and principal credentials.

// crates.io
use rand::RngCore;
// self
use crate::_prelude::*;

/// Number of random bytes behind every generated [`AccessToken`].
pub const ACCESS_TOKEN_BYTES: usize = 32;
/// Length of the lowercase hex rendering of an [`AccessToken`].
pub const ACCESS_TOKEN_LEN: usize = ACCESS_TOKEN_BYTES * 2;

macro_rules! def_secret {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);
		impl $name {
			/// Wraps a secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner secret. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! { AccessToken, "Bearer capability handed to the downstream service; never log it." }
def_secret! { Credential, "Opaque credential (hash, API key, ...) the downstream service needs to act as the principal." }

impl AccessToken {
	/// Mints a new token from 256 bits of CSPRNG output rendered as lowercase hex.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; ACCESS_TOKEN_BYTES];

		rand::rng().fill_bytes(&mut bytes);

		Self(hex::encode(bytes))
	}

	/// Returns `true` if the value has the exact shape produced by [`AccessToken::generate`].
	///
	/// Presented tokens failing this check can be denied without a store lookup.
	pub fn is_well_formed(&self) -> bool {
		self.0.len() == ACCESS_TOKEN_LEN
			&& self.0.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let token = AccessToken::new("super-secret");
		let credential = Credential::new("hash");

		assert_eq!(format!("{token:?}"), "AccessToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(format!("{credential:?}"), "Credential(\"<redacted>\")");
	}

	#[test]
	fn generated_tokens_are_lowercase_hex_and_distinct() {
		let tokens: HashSet<_> = (0..64).map(|_| AccessToken::generate()).collect();

		assert_eq!(tokens.len(), 64);

		for token in &tokens {
			assert_eq!(token.expose().len(), ACCESS_TOKEN_LEN);
			assert!(token.is_well_formed());
		}
	}

	#[test]
	fn malformed_tokens_are_detected() {
		assert!(!AccessToken::new("").is_well_formed());
		assert!(!AccessToken::new("abc123").is_well_formed());
		assert!(!AccessToken::new("A".repeat(ACCESS_TOKEN_LEN)).is_well_formed());
		assert!(!AccessToken::new("g".repeat(ACCESS_TOKEN_LEN)).is_well_formed());
		assert!(AccessToken::new("0f".repeat(ACCESS_TOKEN_BYTES)).is_well_formed());
	}

	#[test]
	fn serializes_as_plain_string() {
		let token = AccessToken::new("abc");

		assert_eq!(serde_json::to_string(&token).expect("Token should serialize."), "\"abc\"");
	}
}
