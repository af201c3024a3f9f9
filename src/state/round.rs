//! Pure scoring model: end totals, aggregate recomputation, completeness,
//! and configuration presets.
//!
//! Every persisted mutation of a round's ends goes through
//! [`recompute_aggregates`], so the stored `total_score`/`average_score` can
//! never drift from the stored `ends`.

use std::time::SystemTime;

use uuid::Uuid;

use crate::dao::models::{EndEntity, RoundEntity, RoundType, Score};

/// Arrows per end used when a round configuration does not specify one.
pub const DEFAULT_ARROWS_PER_END: u32 = 6;

/// Validated configuration used to initialize a round.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// Standard (preset) or custom configuration.
    pub round_type: RoundType,
    /// Shooting distance in meters, strictly positive.
    pub distance: u32,
    /// Number of ends, strictly positive.
    pub ends_count: u32,
    /// Arrows per end, strictly positive.
    pub arrows_per_end: u32,
    /// When the practice session took place.
    pub date: SystemTime,
    /// Optional venue.
    pub location: Option<String>,
    /// Optional note.
    pub memo: Option<String>,
}

/// Number of ends implied by a standard-round distance: 30 m rounds shoot
/// five ends, every other standard distance six.
pub fn standard_ends_count(distance: u32) -> u32 {
    if distance == 30 { 5 } else { 6 }
}

/// Sum of numeric score values over a sequence of arrows.
pub fn end_total(scores: &[Score]) -> u32 {
    scores.iter().map(Score::numeric_value).sum()
}

/// Build a freshly initialized round: `ends_count` pre-allocated empty ends
/// and zeroed aggregates, owned by `user_id`.
pub fn new_round(user_id: String, config: RoundConfig) -> RoundEntity {
    let now = SystemTime::now();
    let ends = (1..=config.ends_count).map(EndEntity::empty).collect();

    RoundEntity {
        id: Uuid::new_v4(),
        user_id,
        round_type: config.round_type,
        distance: config.distance,
        ends_count: config.ends_count,
        arrows_per_end: config.arrows_per_end,
        date: config.date,
        location: config.location,
        memo: config.memo,
        total_score: 0,
        average_score: 0.0,
        ends,
        created_at: now,
        updated_at: now,
    }
}

/// Recompute every end total plus `total_score` and `average_score` from the
/// current `ends`, from scratch.
///
/// Empty ends contribute nothing; the average divides by the arrows actually
/// shot (so a shorter early-finish end still averages correctly) and is 0
/// while no arrow has been recorded.
pub fn recompute_aggregates(round: &mut RoundEntity) {
    let mut total_score = 0u32;
    let mut total_arrows = 0u32;

    for end in &mut round.ends {
        end.total = end_total(&end.scores);
        if !end.is_empty() {
            total_score += end.total;
            total_arrows += end.scores.len() as u32;
        }
    }

    round.total_score = total_score;
    round.average_score = if total_arrows > 0 {
        f64::from(total_score) / f64::from(total_arrows)
    } else {
        0.0
    };
}

/// A round is complete when every end holds at least one score. Always
/// derived from `ends`, never stored.
pub fn is_complete(round: &RoundEntity) -> bool {
    round.ends.iter().all(|end| !end.is_empty())
}

/// Index of the first end without scores, if any.
pub fn first_empty_end(round: &RoundEntity) -> Option<usize> {
    round.ends.iter().position(EndEntity::is_empty)
}

/// Standard round owned by a fixed test user.
#[cfg(test)]
pub(crate) fn sample_round(distance: u32, arrows_per_end: u32) -> RoundEntity {
    new_round(
        "user-1".into(),
        RoundConfig {
            round_type: RoundType::Standard,
            distance,
            ends_count: standard_ends_count(distance),
            arrows_per_end,
            date: SystemTime::now(),
            location: None,
            memo: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::ScoreTokenError;

    fn scores(tokens: &[&str]) -> Vec<Score> {
        tokens
            .iter()
            .map(|token| Score::parse(token).unwrap())
            .collect()
    }

    #[test]
    fn score_numeric_values() {
        assert_eq!(Score::Miss.numeric_value(), 0);
        assert_eq!(Score::InnerTen.numeric_value(), 10);
        for ring in 1..=10 {
            assert_eq!(Score::Ring(ring).numeric_value(), u32::from(ring));
        }
    }

    #[test]
    fn score_display_values() {
        assert_eq!(Score::Miss.display_value(), "M");
        assert_eq!(Score::InnerTen.display_value(), "X");
        assert_eq!(Score::Ring(7).display_value(), "7");
        assert_eq!(Score::Ring(10).display_value(), "10");
    }

    #[test]
    fn score_parses_canonical_tokens() {
        assert_eq!(Score::parse("M"), Ok(Score::Miss));
        assert_eq!(Score::parse("X"), Ok(Score::InnerTen));
        assert_eq!(Score::parse("1"), Ok(Score::Ring(1)));
        assert_eq!(Score::parse("10"), Ok(Score::Ring(10)));
    }

    #[test]
    fn score_rejects_everything_else() {
        for token in ["0", "11", "+10", "01", "x", "m", "Miss", "", " 9"] {
            assert_eq!(
                Score::parse(token),
                Err(ScoreTokenError {
                    token: token.to_owned()
                }),
                "token `{token}` should be rejected"
            );
        }
    }

    #[test]
    fn score_serializes_as_its_token() {
        let json = serde_json::to_string(&Score::InnerTen).unwrap();
        assert_eq!(json, "\"X\"");
        let back: Score = serde_json::from_str("\"10\"").unwrap();
        assert_eq!(back, Score::Ring(10));
        assert!(serde_json::from_str::<Score>("\"11\"").is_err());
    }

    #[test]
    fn end_total_sums_numeric_values() {
        assert_eq!(end_total(&scores(&["X", "10", "9", "9", "8", "M"])), 46);
        assert_eq!(end_total(&[]), 0);
    }

    #[test]
    fn standard_presets() {
        assert_eq!(standard_ends_count(30), 5);
        assert_eq!(standard_ends_count(50), 6);
        assert_eq!(standard_ends_count(70), 6);
    }

    #[test]
    fn new_round_preallocates_empty_ends() {
        let round = sample_round(30, 6);
        assert_eq!(round.ends_count, 5);
        assert_eq!(round.ends.len(), 5);
        for (index, end) in round.ends.iter().enumerate() {
            assert_eq!(end.end_number, index as u32 + 1);
            assert!(end.is_empty());
            assert_eq!(end.total, 0);
        }
        assert_eq!(round.total_score, 0);
        assert_eq!(round.average_score, 0.0);
        assert!(!is_complete(&round));
        assert_eq!(first_empty_end(&round), Some(0));
    }

    #[test]
    fn aggregates_ignore_empty_ends() {
        let mut round = sample_round(30, 6);
        round.ends[0].scores = scores(&["X", "10", "9", "9", "8", "M"]);
        recompute_aggregates(&mut round);

        assert_eq!(round.ends[0].total, 46);
        assert_eq!(round.total_score, 46);
        assert!((round.average_score - 46.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn aggregates_count_actual_arrows_in_partial_ends() {
        let mut round = sample_round(30, 6);
        round.ends[0].scores = scores(&["X", "10", "9", "9", "8", "M"]);
        round.ends[1].scores = scores(&["9", "7"]);
        recompute_aggregates(&mut round);

        assert_eq!(round.total_score, 62);
        assert!((round.average_score - 62.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn aggregates_reset_to_zero_when_all_ends_cleared() {
        let mut round = sample_round(30, 6);
        round.ends[0].scores = scores(&["5", "5", "5", "5", "5", "5"]);
        recompute_aggregates(&mut round);
        assert_eq!(round.total_score, 30);

        round.ends[0].scores.clear();
        recompute_aggregates(&mut round);
        assert_eq!(round.total_score, 0);
        assert_eq!(round.average_score, 0.0);
    }

    #[test]
    fn completeness_is_derived_from_ends() {
        let mut round = sample_round(30, 1);
        for end in &mut round.ends {
            end.scores = scores(&["9"]);
        }
        recompute_aggregates(&mut round);
        assert!(is_complete(&round));
        assert_eq!(first_empty_end(&round), None);

        round.ends[4].scores.clear();
        assert!(!is_complete(&round));
        assert_eq!(first_empty_end(&round), Some(4));
    }
}
