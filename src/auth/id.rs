//! Strongly typed identifiers for protected resources and the principals they are fetched for.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 255;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (resource, sub-resource, principal).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (resource, sub-resource, principal).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed byte length.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (resource, sub-resource, principal).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_id! { ResourceId, "Identifier of a protected object (e.g. `obj:1`).", "Resource" }
def_id! { SubResourceId, "Identifier of one part or stream of a protected object (e.g. `thumb`).", "SubResource" }
def_id! { PrincipalId, "Identifier of the principal a token is issued for.", "Principal" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ResourceId::new(" obj:1").is_err(), "Leading whitespace must be rejected.");
		assert!(ResourceId::new("obj:1 ").is_err(), "Trailing whitespace must be rejected.");

		let resource = ResourceId::new("obj:1").expect("Resource fixture should be valid.");

		assert_eq!(resource.as_ref(), "obj:1");
		assert!(SubResourceId::new("").is_err());
		assert!(PrincipalId::new("with space").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let sub: SubResourceId =
			serde_json::from_str("\"thumb\"").expect("Sub-resource should deserialize.");

		assert_eq!(sub.as_ref(), "thumb");
		assert!(serde_json::from_str::<SubResourceId>("\"two words\"").is_err());
		assert!(serde_json::from_str::<ResourceId>("\"\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ResourceId::new(&exact).expect("Exact length should succeed.");

		let err = ResourceId::new("a".repeat(IDENTIFIER_MAX_LEN + 1))
			.expect_err("Overlong identifiers must be rejected.");

		assert_eq!(err, IdentifierError::TooLong { kind: "Resource", max: IDENTIFIER_MAX_LEN });
	}

	#[test]
	fn debug_names_the_identifier_kind() {
		let sub = SubResourceId::new("OBJ").expect("Sub-resource fixture should be valid.");

		assert_eq!(format!("{sub:?}"), "SubResource(OBJ)");
	}
}
