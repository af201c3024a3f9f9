//! Working state for end-by-end score entry.
//!
//! The pending buffer and the active end index form an explicit value that is
//! threaded through the transition functions; nothing here touches storage.
//! Each transition reports whether the round changed so the caller knows when
//! a persisted write (ends plus recomputed aggregates, in one document) is
//! due.

use thiserror::Error;

use crate::dao::models::{RoundEntity, Score};
use crate::state::round;

/// Transient entry state for one round being scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySession {
    /// 0-based index of the end currently receiving scores. Equals the
    /// round's end count once every end has been finalized.
    pub active_end: usize,
    /// Scores entered for the active end, oldest first, not yet persisted.
    pub pending: Vec<Score>,
}

impl EntrySession {
    /// Open or resume entry: start at the first empty end with a clear
    /// buffer. A fully scored round resumes at the first end, where every
    /// entry transition is a rejection or a no-op.
    pub fn open(round: &RoundEntity) -> Self {
        Self {
            active_end: round::first_empty_end(round).unwrap_or(0),
            pending: Vec::new(),
        }
    }
}

/// Rejections raised by the entry transitions; the round and session are
/// left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// The buffer already holds a full end's worth of arrows.
    #[error("end {end_number} already holds {arrows_per_end} arrows")]
    EndFull {
        /// 1-based number of the saturated end.
        end_number: u32,
        /// Configured arrows per end.
        arrows_per_end: u32,
    },
    /// Every end of the round already holds scores.
    #[error("all {ends_count} ends of the round already hold scores")]
    RoundComplete {
        /// Configured end count.
        ends_count: u32,
    },
}

/// Result of recording one score.
#[derive(Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Score buffered in the session; the round is unchanged.
    Buffered,
    /// The buffer reached the configured arrow count: the active end was
    /// finalized into the round and aggregates recomputed. The round must
    /// be persisted.
    EndCompleted {
        /// 1-based number of the finalized end.
        end_number: u32,
    },
}

/// Result of an undo.
#[derive(Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    /// Most recently buffered score removed; the round is unchanged.
    PendingRemoved,
    /// The previous end was cleared back into the buffer and aggregates
    /// recomputed. The round must be persisted.
    EndReopened {
        /// 1-based number of the reopened end.
        end_number: u32,
    },
    /// Buffer empty at the first end: nothing to undo.
    Noop,
}

/// Result of finishing entry early.
#[derive(Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    /// Buffered scores were finalized into the active end, which may hold
    /// fewer arrows than configured. The round must be persisted.
    EndFinalized {
        /// 1-based number of the finalized end.
        end_number: u32,
    },
    /// Nothing was buffered; the round is unchanged.
    NoPendingScores,
}

/// Record one score into the session, finalizing the active end once the
/// buffer holds exactly `arrows_per_end` entries.
pub fn record_score(
    round: &mut RoundEntity,
    session: &mut EntrySession,
    score: Score,
) -> Result<RecordOutcome, EntryError> {
    let arrows_per_end = round.arrows_per_end as usize;
    if session.pending.len() >= arrows_per_end {
        return Err(EntryError::EndFull {
            end_number: session.active_end as u32 + 1,
            arrows_per_end: round.arrows_per_end,
        });
    }

    if session.pending.is_empty() {
        // An empty buffer always targets the first empty end; this realigns
        // sessions that went stale against a concurrently edited round.
        match round::first_empty_end(round) {
            Some(index) => session.active_end = index,
            None => {
                return Err(EntryError::RoundComplete {
                    ends_count: round.ends_count,
                });
            }
        }
    }

    session.pending.push(score);
    if session.pending.len() == arrows_per_end {
        let end_number = finalize_pending(round, session);
        Ok(RecordOutcome::EndCompleted { end_number })
    } else {
        Ok(RecordOutcome::Buffered)
    }
}

/// Undo the most recent entry action: pop the buffer when it holds scores,
/// otherwise reopen the previous end into the buffer. A no-op with an empty
/// buffer at the first end.
pub fn undo(round: &mut RoundEntity, session: &mut EntrySession) -> UndoOutcome {
    if session.pending.pop().is_some() {
        return UndoOutcome::PendingRemoved;
    }

    if session.active_end == 0 || session.active_end > round.ends.len() {
        return UndoOutcome::Noop;
    }

    let previous = session.active_end - 1;
    session.pending = std::mem::take(&mut round.ends[previous].scores);
    round::recompute_aggregates(round);
    session.active_end = previous;

    UndoOutcome::EndReopened {
        end_number: previous as u32 + 1,
    }
}

/// Finish entry early: a non-empty buffer is finalized as the active end
/// even when it holds fewer arrows than configured; later ends stay empty.
pub fn finish(round: &mut RoundEntity, session: &mut EntrySession) -> FinishOutcome {
    if session.pending.is_empty() {
        return FinishOutcome::NoPendingScores;
    }

    let end_number = finalize_pending(round, session);
    FinishOutcome::EndFinalized { end_number }
}

/// Move the buffered scores into the active end, recompute the round
/// aggregates, and advance past the finalized end.
fn finalize_pending(round: &mut RoundEntity, session: &mut EntrySession) -> u32 {
    let end_number = session.active_end as u32 + 1;
    round.ends[session.active_end].scores = std::mem::take(&mut session.pending);
    round::recompute_aggregates(round);
    session.active_end += 1;
    end_number
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::round::{is_complete, sample_round};

    fn score(token: &str) -> Score {
        Score::parse(token).unwrap()
    }

    fn enter_end(round: &mut RoundEntity, session: &mut EntrySession, tokens: &[&str]) {
        for token in tokens {
            record_score(round, session, score(token)).unwrap();
        }
    }

    #[test]
    fn completing_an_end_updates_round_aggregates() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);

        let tokens = ["X", "10", "9", "9", "8"];
        for token in tokens {
            assert_eq!(
                record_score(&mut round, &mut session, score(token)),
                Ok(RecordOutcome::Buffered)
            );
        }
        assert_eq!(round.total_score, 0, "no write before the end completes");

        assert_eq!(
            record_score(&mut round, &mut session, score("M")),
            Ok(RecordOutcome::EndCompleted { end_number: 1 })
        );

        assert_eq!(round.ends[0].total, 46);
        assert_eq!(round.total_score, 46);
        assert!((round.average_score - 46.0 / 6.0).abs() < 1e-9);
        assert!(session.pending.is_empty());
        assert_eq!(session.active_end, 1);
        assert!(!is_complete(&round));
    }

    #[test]
    fn saturated_buffer_rejects_further_scores() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession {
            active_end: 0,
            pending: vec![score("9"); 6],
        };

        let before = session.clone();
        assert_eq!(
            record_score(&mut round, &mut session, score("9")),
            Err(EntryError::EndFull {
                end_number: 1,
                arrows_per_end: 6
            })
        );
        assert_eq!(session, before);
        assert_eq!(round.total_score, 0);
    }

    #[test]
    fn complete_round_rejects_entry() {
        let mut round = sample_round(30, 1);
        let mut session = EntrySession::open(&round);
        for _ in 0..5 {
            record_score(&mut round, &mut session, score("9")).unwrap();
        }
        assert!(is_complete(&round));

        assert_eq!(
            record_score(&mut round, &mut session, score("9")),
            Err(EntryError::RoundComplete { ends_count: 5 })
        );
        assert_eq!(round.total_score, 45);
    }

    #[test]
    fn undo_pops_the_buffer_last_in_first_out() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);
        enter_end(&mut round, &mut session, &["9", "7"]);

        assert_eq!(undo(&mut round, &mut session), UndoOutcome::PendingRemoved);
        assert_eq!(session.pending, vec![score("9")]);
        assert_eq!(round.total_score, 0);
    }

    #[test]
    fn undo_reopens_the_previous_end() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);
        let tokens = ["X", "10", "9", "9", "8", "M"];
        enter_end(&mut round, &mut session, &tokens);
        assert_eq!(round.total_score, 46);

        assert_eq!(
            undo(&mut round, &mut session),
            UndoOutcome::EndReopened { end_number: 1 }
        );

        assert!(round.ends[0].is_empty());
        assert_eq!(round.ends[0].total, 0);
        assert_eq!(round.total_score, 0);
        assert_eq!(round.average_score, 0.0);
        assert_eq!(session.active_end, 0);
        let expected: Vec<Score> = tokens.iter().map(|token| score(token)).collect();
        assert_eq!(session.pending, expected);
    }

    #[test]
    fn undo_at_the_start_is_a_noop() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);

        let before = round.clone();
        assert_eq!(undo(&mut round, &mut session), UndoOutcome::Noop);
        assert_eq!(undo(&mut round, &mut session), UndoOutcome::Noop);
        assert_eq!(round, before);
        assert_eq!(session, EntrySession::open(&round));
    }

    #[test]
    fn early_finish_keeps_partial_end_and_leaves_the_rest_empty() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);
        enter_end(&mut round, &mut session, &["X", "10", "9", "9", "8", "M"]);
        enter_end(&mut round, &mut session, &["9", "7"]);

        assert_eq!(
            finish(&mut round, &mut session),
            FinishOutcome::EndFinalized { end_number: 2 }
        );

        assert_eq!(round.ends[1].scores.len(), 2);
        assert_eq!(round.ends[1].total, 16);
        assert_eq!(round.total_score, 62);
        assert!((round.average_score - 62.0 / 8.0).abs() < 1e-9);
        assert!(round.ends[2..].iter().all(|end| end.is_empty()));
        assert!(!is_complete(&round));
    }

    #[test]
    fn finish_without_buffered_scores_changes_nothing() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);
        enter_end(&mut round, &mut session, &["X", "10", "9", "9", "8", "M"]);

        let before = round.clone();
        assert_eq!(
            finish(&mut round, &mut session),
            FinishOutcome::NoPendingScores
        );
        assert_eq!(round, before);
    }

    #[test]
    fn entry_resumes_at_the_first_empty_end() {
        let mut round = sample_round(30, 6);
        let mut session = EntrySession::open(&round);
        enter_end(&mut round, &mut session, &["X", "10", "9", "9", "8", "M"]);

        let resumed = EntrySession::open(&round);
        assert_eq!(resumed.active_end, 1);
        assert!(resumed.pending.is_empty());
    }
}
