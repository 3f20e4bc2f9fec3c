//! External services used by the admin panel.

pub mod identity;

pub use identity::{HttpIdentityProvider, IdentityError, IdentityProvider, VerifiedIdentity};
