//! Session-stored admin identity.

use serde::{Deserialize, Serialize};

use crate::services::VerifiedIdentity;

/// The signed-in admin, as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Identity provider user id.
    pub uid: String,
    pub email: String,
}

impl From<VerifiedIdentity> for CurrentAdmin {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
