//! Auth-domain identifiers, identities, resource targets, and token models.

pub mod id;
pub mod identity;
pub mod token;

pub use id::*;
pub use identity::*;
pub use token::{record::*, secret::*, target::*};
