use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        entry::{EntryProgress, ScoreInputRequest},
        round::RoundDetail,
    },
    error::AppError,
    identity::Identity,
    services::entry_service,
    state::SharedState,
};

/// Routes driving end-by-end score entry for a round.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rounds/{id}/entry", get(open_entry))
        .route("/rounds/{id}/entry/scores", post(record_score))
        .route("/rounds/{id}/entry/undo", post(undo_score))
        .route("/rounds/{id}/entry/finish", post(finish_entry))
}

/// Open or resume score entry at the first empty end.
#[utoipa::path(
    get,
    path = "/rounds/{id}/entry",
    tag = "entry",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Entry state", body = EntryProgress),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn open_entry(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryProgress>, AppError> {
    let progress = entry_service::open_entry(&state, &identity, id).await?;
    Ok(Json(progress))
}

/// Record one score token; the end is finalized and persisted once the
/// buffer holds the configured arrow count.
#[utoipa::path(
    post,
    path = "/rounds/{id}/entry/scores",
    tag = "entry",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    request_body = ScoreInputRequest,
    responses(
        (status = 200, description = "Entry state after the score", body = EntryProgress),
        (status = 400, description = "Invalid score token or saturated end"),
        (status = 409, description = "Round already complete")
    )
)]
pub async fn record_score(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<ScoreInputRequest>>,
) -> Result<Json<EntryProgress>, AppError> {
    let progress = entry_service::record_score(&state, &identity, id, &payload.score).await?;
    Ok(Json(progress))
}

/// Undo the most recent entry action.
#[utoipa::path(
    post,
    path = "/rounds/{id}/entry/undo",
    tag = "entry",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Entry state after the undo", body = EntryProgress),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn undo_score(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryProgress>, AppError> {
    let progress = entry_service::undo_score(&state, &identity, id).await?;
    Ok(Json(progress))
}

/// Finish entry early, persisting a partially filled final end when scores
/// are buffered.
#[utoipa::path(
    post,
    path = "/rounds/{id}/entry/finish",
    tag = "entry",
    params(("id" = Uuid, Path, description = "Identifier of the round")),
    responses(
        (status = 200, description = "Round after finishing entry", body = RoundDetail),
        (status = 404, description = "Round does not exist")
    )
)]
pub async fn finish_entry(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundDetail>, AppError> {
    let detail = entry_service::finish_entry(&state, &identity, id).await?;
    Ok(Json(detail))
}
