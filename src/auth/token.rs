//! Token secrets, resource targets, and persisted token records.

pub mod record;
pub mod secret;
pub mod target;
