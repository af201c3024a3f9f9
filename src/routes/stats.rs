use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::stats::{StatsQuery, StatsResponse},
    error::AppError,
    identity::Identity,
    services::stats_service,
    state::SharedState,
};

/// Routes exposing read-only aggregate statistics.
pub fn router() -> Router<SharedState> {
    Router::new().route("/stats", get(statistics))
}

/// Aggregate statistics over the caller's rounds, optionally filtered to a
/// single distance.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    params(StatsQuery),
    responses((status = 200, description = "Aggregate statistics", body = StatsResponse))
)]
pub async fn statistics(
    State(state): State<SharedState>,
    identity: Identity,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = stats_service::statistics(&state, &identity, query.distance).await?;
    Ok(Json(stats))
}
