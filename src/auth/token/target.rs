//! Resource targets that scope a token to one object part.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ResourceId, SubResourceId},
};

/// The protected object and the specific part of it a token authorizes fetching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceTarget {
	/// Protected object identifier.
	pub resource: ResourceId,
	/// Part or stream of the object.
	pub sub_resource: SubResourceId,
}
impl ResourceTarget {
	/// Creates a target for the provided resource + sub-resource pair.
	pub fn new(resource: ResourceId, sub_resource: SubResourceId) -> Self {
		Self { resource, sub_resource }
	}

	/// Parses both identifiers from raw strings.
	pub fn parse(
		resource: impl AsRef<str>,
		sub_resource: impl AsRef<str>,
	) -> Result<Self, IdentifierError> {
		Ok(Self::new(ResourceId::new(resource)?, SubResourceId::new(sub_resource)?))
	}
}
impl Display for ResourceTarget {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}", self.resource, self.sub_resource)
	}
}
