use serde::Serialize;
use utoipa::ToSchema;

use crate::identity::Identity;

/// The requesting user as asserted by the identity proxy.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    /// Opaque owner identifier.
    pub user_id: String,
    /// Email address asserted by the proxy.
    pub email: String,
    /// Display name derived from the email local part.
    pub display_name: String,
}

impl From<Identity> for UserProfile {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            display_name: identity.display_name,
        }
    }
}
