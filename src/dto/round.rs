use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{EndEntity, RoundEntity, RoundType},
    dto::format_system_time,
    state::round,
};

/// Payload used to create a new round.
///
/// For standard rounds the end count is implied by the distance (30 m
/// shoots five ends, other distances six) and any supplied `ends_count` is
/// ignored; custom rounds must specify it.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoundRequest {
    /// Standard (preset) or custom configuration.
    pub round_type: RoundType,
    /// Shooting distance in meters.
    #[validate(range(min = 1, message = "distance must be a positive number of meters"))]
    pub distance: u32,
    /// Number of ends; required for custom rounds.
    #[serde(default)]
    #[validate(range(min = 1, message = "ends count must be a positive integer"))]
    pub ends_count: Option<u32>,
    /// Arrows per end; defaults to 6 when omitted.
    #[serde(default)]
    #[validate(range(min = 1, message = "arrows per end must be a positive integer"))]
    pub arrows_per_end: Option<u32>,
    /// RFC 3339 session timestamp; defaults to the creation time.
    #[serde(default)]
    pub date: Option<String>,
    /// Optional venue.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Optional note (weather, condition, ...).
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub memo: Option<String>,
}

/// Merge-update of a round's editable metadata. Omitted fields stay
/// unchanged; an empty string clears the optional text fields.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateRoundRequest {
    /// RFC 3339 session timestamp.
    #[serde(default)]
    pub date: Option<String>,
    /// New venue; empty clears it.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// New note; empty clears it.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub memo: Option<String>,
}

/// One end of a round as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndView {
    /// 1-based position within the round.
    pub end_number: u32,
    /// Display tokens of the recorded arrows, in entry order.
    pub scores: Vec<String>,
    /// Sum of the end's numeric score values.
    pub total: u32,
}

/// Full round representation returned by the detail endpoints.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundDetail {
    /// Round identifier.
    pub id: Uuid,
    /// Standard or custom configuration.
    pub round_type: RoundType,
    /// Shooting distance in meters.
    pub distance: u32,
    /// Configured number of ends.
    pub ends_count: u32,
    /// Configured arrows per end.
    pub arrows_per_end: u32,
    /// RFC 3339 session timestamp.
    pub date: String,
    /// Venue, when recorded.
    pub location: Option<String>,
    /// Note, when recorded.
    pub memo: Option<String>,
    /// Sum of end totals over the scored ends.
    pub total_score: u32,
    /// Average points per arrow actually shot; 0 before any arrow.
    pub average_score: f64,
    /// Whether every end holds scores; derived, never stored.
    pub complete: bool,
    /// All ends, scored and empty alike.
    pub ends: Vec<EndView>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-update timestamp.
    pub updated_at: String,
}

/// Compact round representation returned by the list endpoint.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundSummary {
    /// Round identifier.
    pub id: Uuid,
    /// Standard or custom configuration.
    pub round_type: RoundType,
    /// Shooting distance in meters.
    pub distance: u32,
    /// Configured number of ends.
    pub ends_count: u32,
    /// Configured arrows per end.
    pub arrows_per_end: u32,
    /// RFC 3339 session timestamp.
    pub date: String,
    /// Venue, when recorded.
    pub location: Option<String>,
    /// Sum of end totals over the scored ends.
    pub total_score: u32,
    /// Average points per arrow actually shot; 0 before any arrow.
    pub average_score: f64,
    /// Whether every end holds scores; derived, never stored.
    pub complete: bool,
}

impl From<EndEntity> for EndView {
    fn from(end: EndEntity) -> Self {
        Self {
            end_number: end.end_number,
            scores: end.scores.iter().map(|score| score.display_value()).collect(),
            total: end.total,
        }
    }
}

impl From<RoundEntity> for RoundDetail {
    fn from(entity: RoundEntity) -> Self {
        let complete = round::is_complete(&entity);
        Self {
            id: entity.id,
            round_type: entity.round_type,
            distance: entity.distance,
            ends_count: entity.ends_count,
            arrows_per_end: entity.arrows_per_end,
            date: format_system_time(entity.date),
            location: entity.location,
            memo: entity.memo,
            total_score: entity.total_score,
            average_score: entity.average_score,
            complete,
            ends: entity.ends.into_iter().map(Into::into).collect(),
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}

impl From<RoundEntity> for RoundSummary {
    fn from(entity: RoundEntity) -> Self {
        let complete = round::is_complete(&entity);
        Self {
            id: entity.id,
            round_type: entity.round_type,
            distance: entity.distance,
            ends_count: entity.ends_count,
            arrows_per_end: entity.arrows_per_end,
            date: format_system_time(entity.date),
            location: entity.location,
            total_score: entity.total_score,
            average_score: entity.average_score,
            complete,
        }
    }
}
