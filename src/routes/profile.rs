use axum::{Json, Router, routing::get};

use crate::{dto::profile::UserProfile, identity::Identity, state::SharedState};

/// Route exposing the identity the proxy asserted for this request.
pub fn router() -> Router<SharedState> {
    Router::new().route("/profile", get(profile))
}

/// Return the requesting user's identity triple.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "No usable identity")
    )
)]
pub async fn profile(identity: Identity) -> Json<UserProfile> {
    Json(identity.into())
}
