use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::RoundEntity,
    dto::{round::RoundDetail, validation::validate_score_token},
    state::{entry::EntrySession, round},
};

/// One raw score token entered for the active end.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ScoreInputRequest {
    /// Raw score token: `1`-`10`, `M`, or `X`.
    #[validate(custom(function = validate_score_token))]
    pub score: String,
}

/// Snapshot of the entry flow after an entry action.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryProgress {
    /// 1-based number of the end currently receiving scores; one past the
    /// end count once every end is finalized.
    pub active_end: u32,
    /// Display tokens buffered for the active end, not yet persisted.
    pub pending_scores: Vec<String>,
    /// Running total of the buffered scores.
    pub pending_total: u32,
    /// Whether every end of the round holds scores.
    pub round_complete: bool,
    /// The round as persisted, aggregates included.
    pub round: RoundDetail,
}

impl EntryProgress {
    /// Project the persisted round plus the transient session state.
    pub fn new(round: RoundEntity, session: &EntrySession) -> Self {
        Self {
            active_end: session.active_end as u32 + 1,
            pending_scores: session
                .pending
                .iter()
                .map(|score| score.display_value())
                .collect(),
            pending_total: round::end_total(&session.pending),
            round_complete: round::is_complete(&round),
            round: round.into(),
        }
    }
}
