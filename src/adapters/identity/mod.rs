//! IdentityPort implementations.

pub mod local_identity;

pub use local_identity::LocalIdentity;
