use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{
    dao::models::RoundEntity,
    dto::stats::{DistanceStats, ScoreBucket, StatsResponse},
    error::ServiceError,
    identity::Identity,
    state::SharedState,
};

/// Histogram display order, best token first.
const SCORE_TOKEN_ORDER: [&str; 12] = [
    "X", "10", "9", "8", "7", "6", "5", "4", "3", "2", "1", "M",
];

/// Compute the caller's statistics, optionally restricted to one distance.
pub async fn statistics(
    state: &SharedState,
    identity: &Identity,
    distance: Option<u32>,
) -> Result<StatsResponse, ServiceError> {
    let store = state.require_round_store().await?;
    let rounds = store.list_rounds(identity.user_id.clone()).await?;
    Ok(compute_statistics(&rounds, distance))
}

/// Pure read-side fold over already-persisted rounds.
///
/// Every token bucket is reported even when its count is zero, in display
/// order; percentages are of the arrows actually shot and 0.0 for an empty
/// set. The per-distance breakdown is only produced for unfiltered queries.
pub(crate) fn compute_statistics(
    rounds: &[RoundEntity],
    distance: Option<u32>,
) -> StatsResponse {
    let filtered: Vec<&RoundEntity> = rounds
        .iter()
        .filter(|round| distance.is_none_or(|wanted| round.distance == wanted))
        .collect();

    let mut histogram: IndexMap<&'static str, u32> =
        SCORE_TOKEN_ORDER.iter().map(|token| (*token, 0)).collect();
    let mut total_arrows = 0u32;

    for round in &filtered {
        for end in round.ends.iter().filter(|end| !end.is_empty()) {
            for score in &end.scores {
                let token = score.display_value();
                if let Some(count) = histogram.get_mut(token.as_str()) {
                    *count += 1;
                }
                total_arrows += 1;
            }
        }
    }

    let total_rounds = filtered.len() as u32;
    let average_score = if filtered.is_empty() {
        0.0
    } else {
        filtered
            .iter()
            .map(|round| f64::from(round.total_score))
            .sum::<f64>()
            / f64::from(total_rounds)
    };
    let highest_score = filtered.iter().map(|r| r.total_score).max().unwrap_or(0);
    let lowest_score = filtered.iter().map(|r| r.total_score).min().unwrap_or(0);

    let score_distribution = histogram
        .into_iter()
        .map(|(token, count)| ScoreBucket {
            token: token.to_owned(),
            count,
            percentage: if total_arrows > 0 {
                f64::from(count) * 100.0 / f64::from(total_arrows)
            } else {
                0.0
            },
        })
        .collect();

    let by_distance = distance.is_none().then(|| {
        let mut grouped: BTreeMap<u32, Vec<&RoundEntity>> = BTreeMap::new();
        for round in &filtered {
            grouped.entry(round.distance).or_default().push(round);
        }

        grouped
            .into_iter()
            .map(|(distance, group)| DistanceStats {
                distance,
                rounds: group.len() as u32,
                average_score: group
                    .iter()
                    .map(|round| f64::from(round.total_score))
                    .sum::<f64>()
                    / group.len() as f64,
                highest_score: group.iter().map(|r| r.total_score).max().unwrap_or(0),
            })
            .collect()
    });

    StatsResponse {
        total_rounds,
        average_score,
        highest_score,
        lowest_score,
        total_arrows,
        score_distribution,
        by_distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Score;
    use crate::state::round::{recompute_aggregates, sample_round};

    fn scored_round(distance: u32, end_tokens: &[&[&str]]) -> RoundEntity {
        let mut round = sample_round(distance, 6);
        for (index, tokens) in end_tokens.iter().enumerate() {
            round.ends[index].scores = tokens
                .iter()
                .map(|token| Score::parse(token).unwrap())
                .collect();
        }
        recompute_aggregates(&mut round);
        round
    }

    fn bucket<'s>(stats: &'s StatsResponse, token: &str) -> &'s ScoreBucket {
        stats
            .score_distribution
            .iter()
            .find(|bucket| bucket.token == token)
            .unwrap()
    }

    #[test]
    fn empty_set_yields_zeroes_without_division_errors() {
        let stats = compute_statistics(&[], None);
        assert_eq!(stats.total_rounds, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.highest_score, 0);
        assert_eq!(stats.lowest_score, 0);
        assert_eq!(stats.total_arrows, 0);
        assert_eq!(stats.score_distribution.len(), 12);
        assert!(
            stats
                .score_distribution
                .iter()
                .all(|bucket| bucket.count == 0 && bucket.percentage == 0.0)
        );
        assert_eq!(stats.by_distance.as_deref(), Some(&[][..]));
    }

    #[test]
    fn mean_max_min_over_two_rounds_at_one_distance() {
        let mut first = sample_round(50, 6);
        let mut second = sample_round(50, 6);
        first.total_score = 300;
        second.total_score = 320;

        let stats = compute_statistics(&[first, second], Some(50));
        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.average_score, 310.0);
        assert_eq!(stats.highest_score, 320);
        assert_eq!(stats.lowest_score, 300);
        assert!(stats.by_distance.is_none());
    }

    #[test]
    fn histogram_counts_tokens_and_percentages_sum_to_one_hundred() {
        let round = scored_round(30, &[&["X", "10", "9", "9", "8", "M"]]);
        let stats = compute_statistics(std::slice::from_ref(&round), None);

        assert_eq!(stats.total_arrows, 6);
        assert_eq!(bucket(&stats, "X").count, 1);
        assert_eq!(bucket(&stats, "10").count, 1);
        assert_eq!(bucket(&stats, "9").count, 2);
        assert_eq!(bucket(&stats, "8").count, 1);
        assert_eq!(bucket(&stats, "M").count, 1);
        assert_eq!(bucket(&stats, "7").count, 0);

        let sum: f64 = stats
            .score_distribution
            .iter()
            .map(|bucket| bucket.percentage)
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let order: Vec<&str> = stats
            .score_distribution
            .iter()
            .map(|bucket| bucket.token.as_str())
            .collect();
        assert_eq!(order, SCORE_TOKEN_ORDER);
    }

    #[test]
    fn distance_filter_restricts_the_fold() {
        let near = scored_round(30, &[&["9", "9", "9", "9", "9", "9"]]);
        let far = scored_round(70, &[&["7", "7", "7", "7", "7", "7"]]);

        let stats = compute_statistics(&[near.clone(), far.clone()], Some(70));
        assert_eq!(stats.total_rounds, 1);
        assert_eq!(stats.highest_score, 42);
        assert_eq!(stats.total_arrows, 6);
        assert_eq!(bucket(&stats, "9").count, 0);

        let unfiltered = compute_statistics(&[near, far], None);
        let breakdown = unfiltered.by_distance.unwrap();
        assert_eq!(
            breakdown,
            vec![
                DistanceStats {
                    distance: 30,
                    rounds: 1,
                    average_score: 54.0,
                    highest_score: 54,
                },
                DistanceStats {
                    distance: 70,
                    rounds: 1,
                    average_score: 42.0,
                    highest_score: 42,
                },
            ]
        );
    }

    #[test]
    fn unscored_ends_contribute_no_arrows() {
        let round = scored_round(30, &[&["5", "5", "5", "5", "5", "5"]]);
        let stats = compute_statistics(std::slice::from_ref(&round), None);
        assert_eq!(stats.total_arrows, 6);
        assert_eq!(bucket(&stats, "5").count, 6);
    }
}
