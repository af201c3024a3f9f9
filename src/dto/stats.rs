use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by the statistics endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    /// Restrict the statistics to rounds shot at this distance (meters).
    #[serde(default)]
    pub distance: Option<u32>,
}

/// One bucket of the score-token histogram.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct ScoreBucket {
    /// Display token (`X`, `10` ... `1`, `M`).
    pub token: String,
    /// Number of arrows that scored this token.
    pub count: u32,
    /// Share of all arrows shot, in percent; 0.0 when no arrow was shot.
    pub percentage: f64,
}

/// Per-distance breakdown included when no distance filter is applied.
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct DistanceStats {
    /// Shooting distance in meters.
    pub distance: u32,
    /// Number of rounds shot at this distance.
    pub rounds: u32,
    /// Mean total score across those rounds.
    pub average_score: f64,
    /// Best total score across those rounds.
    pub highest_score: u32,
}

/// Aggregate statistics over the caller's rounds.
#[skip_serializing_none]
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of rounds considered.
    pub total_rounds: u32,
    /// Mean total score across the rounds; 0 for an empty set.
    pub average_score: f64,
    /// Best total score; 0 for an empty set.
    pub highest_score: u32,
    /// Worst total score; 0 for an empty set.
    pub lowest_score: u32,
    /// Arrows shot across all scored ends of the rounds.
    pub total_arrows: u32,
    /// Histogram over score tokens in display order (X, 10 ... 1, M).
    pub score_distribution: Vec<ScoreBucket>,
    /// Per-distance breakdown, only when no distance filter was applied.
    pub by_distance: Option<Vec<DistanceStats>>,
}
