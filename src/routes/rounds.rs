use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::round::{CreateRoundRequest, RoundDetail, RoundSummary, UpdateRoundRequest},
    error::AppError,
    identity::Identity,
    services::round_service,
    state::SharedState,
};

/// Routes handling round creation, listing, and management.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rounds", post(create_round).get(list_rounds))
        .route(
            "/rounds/{id}",
            get(get_round).patch(update_round).delete(delete_round),
        )
}

/// Create a round with all ends pre-allocated empty.
#[utoipa::path(
    post,
    path = "/rounds",
    tag = "rounds",
    request_body = CreateRoundRequest,
    responses(
        (status = 200, description = "Round created", body = RoundDetail),
        (status = 400, description = "Invalid configuration")
    )
)]
pub async fn create_round(
    State(state): State<SharedState>,
    identity: Identity,
    Valid(Json(payload)): Valid<Json<CreateRoundRequest>>,
) -> Result<Json<RoundDetail>, AppError> {
    let detail = round_service::create_round(&state, &identity, payload).await?;
    Ok(Json(detail))
}

/// List the caller's rounds, most recent practice date first.
#[utoipa::path(
    get,
    path = "/rounds",
    tag = "rounds",
    responses((status = 200, description = "Rounds of the caller", body = [RoundSummary]))
)]
pub async fn list_rounds(
    State(state): State<SharedState>,
    identity: Identity,
) -> Result<Json<Vec<RoundSummary>>, AppError> {
    let rounds = round_service::list_rounds(&state, &identity).await?;
    Ok(Json(rounds))
}

/// Fetch one round with all its ends.
#[utoipa::path(
    get,
    path = "/rounds/{id}",
    tag = "rounds",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Round detail", body = RoundDetail),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn get_round(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundDetail>, AppError> {
    let detail = round_service::get_round(&state, &identity, id).await?;
    Ok(Json(detail))
}

/// Merge-update a round's editable metadata (date, location, memo).
#[utoipa::path(
    patch,
    path = "/rounds/{id}",
    tag = "rounds",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    request_body = UpdateRoundRequest,
    responses(
        (status = 200, description = "Updated round", body = RoundDetail),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn update_round(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdateRoundRequest>>,
) -> Result<Json<RoundDetail>, AppError> {
    let detail = round_service::update_round(&state, &identity, id, payload).await?;
    Ok(Json(detail))
}

/// Delete a round and any in-progress entry session for it.
#[utoipa::path(
    delete,
    path = "/rounds/{id}",
    tag = "rounds",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn delete_round(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    round_service::delete_round(&state, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
