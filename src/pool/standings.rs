// Season standings: sums weekly confidence results per user and assigns
// a deterministic 1-based ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::confidence::{accuracy, WeeklyScore};

/// One user's season-to-date confidence totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStanding {
    pub user_id: String,
    /// 1-based position after [`rank_standings`]; zero until ranked.
    pub rank: u32,
    pub total_points: u32,
    pub correct_picks: u32,
    pub total_picks: u32,
    /// Recomputed from season totals, not averaged over weeks.
    pub accuracy: f64,
}

/// Sum weekly scores into one standing per user. Accuracy is recomputed
/// from the summed correct and total counts so weeks with different game
/// counts carry their natural weight.
pub fn aggregate_season(weekly: &[WeeklyScore]) -> Vec<SeasonStanding> {
    let mut totals: BTreeMap<&str, (u32, u32, u32)> = BTreeMap::new();
    for score in weekly {
        let entry = totals.entry(score.user_id.as_str()).or_default();
        entry.0 += score.total_points;
        entry.1 += score.correct_picks;
        entry.2 += score.total_picks;
    }
    totals
        .into_iter()
        .map(|(user_id, (points, correct, total))| SeasonStanding {
            user_id: user_id.to_string(),
            rank: 0,
            total_points: points,
            correct_picks: correct,
            total_picks: total,
            accuracy: accuracy(correct, total),
        })
        .collect()
}

/// Order standings and assign ranks.
///
/// Sort is total points descending, then accuracy descending, then user id
/// ascending, so the output is a total order regardless of input order.
/// Users with equal points and accuracy share a rank; the next distinct
/// key resumes at its 1-based position.
pub fn rank_standings(mut standings: Vec<SeasonStanding>) -> Vec<SeasonStanding> {
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.accuracy.total_cmp(&a.accuracy))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    let mut prev_key: Option<(u32, f64)> = None;
    let mut prev_rank = 0;
    for (i, standing) in standings.iter_mut().enumerate() {
        let key = (standing.total_points, standing.accuracy);
        let tied = prev_key
            .map(|(p, a)| p == key.0 && a.total_cmp(&key.1).is_eq())
            .unwrap_or(false);
        standing.rank = if tied { prev_rank } else { i as u32 + 1 };
        prev_rank = standing.rank;
        prev_key = Some(key);
    }
    standings
}
