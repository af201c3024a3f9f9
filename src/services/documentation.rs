use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the archery log backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::profile::profile,
        crate::routes::rounds::create_round,
        crate::routes::rounds::list_rounds,
        crate::routes::rounds::get_round,
        crate::routes::rounds::update_round,
        crate::routes::rounds::delete_round,
        crate::routes::entry::open_entry,
        crate::routes::entry::record_score,
        crate::routes::entry::undo_score,
        crate::routes::entry::finish_entry,
        crate::routes::stats::statistics,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::profile::UserProfile,
            crate::dto::round::CreateRoundRequest,
            crate::dto::round::UpdateRoundRequest,
            crate::dto::round::RoundDetail,
            crate::dto::round::RoundSummary,
            crate::dto::round::EndView,
            crate::dto::entry::ScoreInputRequest,
            crate::dto::entry::EntryProgress,
            crate::dto::stats::StatsResponse,
            crate::dto::stats::ScoreBucket,
            crate::dto::stats::DistanceStats,
            crate::dao::models::RoundType,
        )
    ),
    tags(
        (name = "rounds", description = "Round creation, listing, and management"),
        (name = "entry", description = "End-by-end score entry"),
        (name = "stats", description = "Aggregate statistics"),
        (name = "profile", description = "Current-user information"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
