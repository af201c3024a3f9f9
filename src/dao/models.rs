use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// One arrow's recorded result.
///
/// Persisted and transported as its display token (`"X"`, `"M"`, or the ring
/// digits), so the numeric and display projections are always derived from
/// the stored value and can never drift from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Score {
    /// Plain ring hit, 1 through 10.
    Ring(u8),
    /// Shot that scored zero, displayed as `M`.
    Miss,
    /// Innermost-ring hit: worth 10 points, displayed as `X`.
    InnerTen,
}

/// Raised when a raw token is not one of `1`-`10`, `M`, or `X`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid score token `{token}`: expected 1-10, `M`, or `X`")]
pub struct ScoreTokenError {
    /// The rejected input token.
    pub token: String,
}

impl Score {
    /// Contribution of this score to totals: 0 for a miss, 10 for an X,
    /// the ring value otherwise.
    pub fn numeric_value(&self) -> u32 {
        match self {
            Score::Ring(value) => u32::from(*value),
            Score::Miss => 0,
            Score::InnerTen => 10,
        }
    }

    /// Human-readable label: `M`, `X`, or the ring digits.
    pub fn display_value(&self) -> String {
        match self {
            Score::Ring(value) => value.to_string(),
            Score::Miss => "M".to_owned(),
            Score::InnerTen => "X".to_owned(),
        }
    }

    /// Parse a raw token. Only the canonical tokens are accepted; anything
    /// else (out-of-range rings, signs, leading zeros) is rejected rather
    /// than coerced.
    pub fn parse(token: &str) -> Result<Self, ScoreTokenError> {
        match token {
            "M" => Ok(Score::Miss),
            "X" => Ok(Score::InnerTen),
            _ => token
                .parse::<u8>()
                .ok()
                .filter(|value| (1..=10).contains(value) && value.to_string() == token)
                .map(Score::Ring)
                .ok_or_else(|| ScoreTokenError {
                    token: token.to_owned(),
                }),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<Score> for String {
    fn from(score: Score) -> Self {
        score.display_value()
    }
}

impl TryFrom<String> for Score {
    type Error = ScoreTokenError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Score::parse(&token)
    }
}

/// Shooting configuration family of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoundType {
    /// Preset configuration where the distance implies the end count.
    Standard,
    /// Free-form configuration supplied entirely by the caller.
    Custom,
}

/// One scoring end stored inside a round and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndEntity {
    /// 1-based position within the round; fixed when the round is created.
    pub end_number: u32,
    /// Recorded arrows in entry order. Empty until the end has been shot.
    pub scores: Vec<Score>,
    /// Sum of the numeric values of `scores`; 0 while empty. Only the
    /// aggregate recompute writes this field.
    pub total: u32,
}

impl EndEntity {
    /// Placeholder end allocated when a round is initialized.
    pub fn empty(end_number: u32) -> Self {
        Self {
            end_number,
            scores: Vec::new(),
            total: 0,
        }
    }

    /// An end is empty until at least one arrow has been recorded for it.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Aggregate round entity persisted by the storage layer and shared across
/// layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundEntity {
    /// Primary key of the round, assigned by the backend at creation.
    pub id: Uuid,
    /// Owning identity; set at creation and checked on every access.
    pub user_id: String,
    /// Standard (preset) or custom configuration.
    pub round_type: RoundType,
    /// Shooting distance in meters.
    pub distance: u32,
    /// Number of ends, fixed at creation; `ends` always holds this many.
    pub ends_count: u32,
    /// Arrows shot per end.
    pub arrows_per_end: u32,
    /// When the practice session took place.
    pub date: SystemTime,
    /// Optional free-text venue.
    pub location: Option<String>,
    /// Optional free-text note (weather, condition, ...).
    pub memo: Option<String>,
    /// Sum of end totals over the ends that hold scores.
    pub total_score: u32,
    /// `total_score` divided by the arrows actually shot; 0 before any
    /// arrow is recorded.
    pub average_score: f64,
    /// All ends of the round, pre-allocated empty and indexed 1-based.
    pub ends: Vec<EndEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the round document was updated.
    pub updated_at: SystemTime,
}
