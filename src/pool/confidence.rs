// Confidence scoring: one week at a time, every user who submitted picks.
// Correct pick earns its confidence value; wrong, tied, pending, and
// unresolvable picks earn zero. Duplicates are resolved by a documented
// precedence rule and flagged, never summed.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::flags::Flag;
use super::game::Game;
use super::picks::ConfidencePick;
use super::teams::normalize;
use super::PoolError;

/// Per-user result for one scored week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub user_id: String,
    pub week: u32,
    /// Sum of confidence values on correct picks.
    pub total_points: u32,
    pub correct_picks: u32,
    /// Every submitted pick, including those on games not yet final.
    /// The accuracy denominator.
    pub total_picks: u32,
    /// The subset of `total_picks` whose games are not yet final. Lets a
    /// caller tell "no games final yet" apart from "picks went nowhere".
    pub pending_picks: u32,
    /// `correct_picks / total_picks * 100`, rounded to one decimal place.
    /// `0.0` when there are no picks at all.
    pub accuracy: f64,
}

/// Everything `score_week` produces: one score per participating user,
/// plus every anomaly found along the way.
#[derive(Debug, Clone)]
pub struct ScoredWeek {
    pub week: u32,
    pub scores: Vec<WeeklyScore>,
    pub flags: Vec<Flag>,
}

/// Score one week of confidence picks against that week's games.
///
/// Hard preconditions: every supplied game must belong to `week`, and a
/// week with picks must have at least one game. Everything else is a
/// per-record anomaly reported through [`Flag`]s on the result.
/// Deterministic: same inputs, same output, scores ordered by user id.
pub fn score_week(
    week: u32,
    picks: &[ConfidencePick],
    games: &[Game],
) -> Result<ScoredWeek, PoolError> {
    for game in games {
        if game.week != week {
            return Err(PoolError::GameWeekMismatch {
                game_id: game.game_id.clone(),
                game_week: game.week,
                week,
            });
        }
    }

    let mut flags = Vec::new();

    // A pick keyed to a different week is a mis-filed document. It cannot
    // score here and must not vanish, so it becomes a flag.
    let mut week_picks: Vec<&ConfidencePick> = Vec::new();
    for pick in picks {
        if pick.week == week {
            week_picks.push(pick);
        } else {
            flags.push(Flag::PickWeekMismatch {
                user_id: pick.user_id.clone(),
                week,
                pick_week: pick.week,
                game_id: pick.game_id.clone(),
            });
        }
    }
    if !week_picks.is_empty() && games.is_empty() {
        return Err(PoolError::NoGamesForWeek { week });
    }

    let games_by_id: HashMap<&str, &Game> =
        games.iter().map(|g| (g.game_id.as_str(), g)).collect();

    // Group per user, resolving duplicate game entries as we go. First
    // encountered wins; later entries for the same game are flagged.
    let mut per_user: BTreeMap<&str, Vec<&ConfidencePick>> = BTreeMap::new();
    for pick in &week_picks {
        let user_picks = per_user.entry(pick.user_id.as_str()).or_default();
        if let Some(kept) = user_picks.iter().find(|p| p.game_id == pick.game_id) {
            flags.push(Flag::DuplicatePick {
                user_id: pick.user_id.clone(),
                week,
                game_id: pick.game_id.clone(),
                kept_confidence: kept.confidence,
                dropped_confidence: pick.confidence,
            });
            continue;
        }
        user_picks.push(pick);
    }

    let mut scores = Vec::with_capacity(per_user.len());
    for (user_id, user_picks) in &per_user {
        let mut confidences: Vec<u32> = user_picks.iter().map(|p| p.confidence).collect();
        confidences.sort_unstable();
        let expected: Vec<u32> = (1..=games.len() as u32).collect();
        if confidences != expected {
            flags.push(Flag::ConfidenceNotPermutation {
                user_id: user_id.to_string(),
                week,
                confidences,
                expected_games: games.len(),
            });
        }

        let mut total_points = 0;
        let mut correct_picks = 0;
        let mut total_picks = 0;
        let mut pending_picks = 0;
        for pick in user_picks {
            let game = match games_by_id.get(pick.game_id.as_str()) {
                Some(game) => *game,
                None => {
                    flags.push(Flag::UnresolvedGame {
                        user_id: user_id.to_string(),
                        week,
                        game_id: pick.game_id.clone(),
                    });
                    total_picks += 1;
                    continue;
                }
            };
            total_picks += 1;
            if !game.is_final() {
                pending_picks += 1;
                continue;
            }
            // A tie has no winner, so no pick on it is correct.
            if let Some(winner) = game.final_winner() {
                if normalize(winner) == pick.team {
                    correct_picks += 1;
                    total_points += pick.confidence;
                }
            }
        }

        scores.push(WeeklyScore {
            user_id: user_id.to_string(),
            week,
            total_points,
            correct_picks,
            total_picks,
            pending_picks,
            accuracy: accuracy(correct_picks, total_picks),
        });
    }

    Ok(ScoredWeek {
        week,
        scores,
        flags,
    })
}

/// Percentage of correct picks, rounded to one decimal place. Zero picks
/// means `0.0`, never a division by zero.
pub fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = f64::from(correct) / f64::from(total) * 100.0;
    (pct * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::game::GameStatus;

    fn game(id: &str, home: &str, away: &str, winner: Option<&str>) -> Game {
        Game {
            game_id: id.to_string(),
            week: 1,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: Some(20),
            away_score: Some(10),
            status: GameStatus::Final,
            winner: winner.map(|w| w.to_string()),
        }
    }

    fn pick(user: &str, game_id: &str, team: &str, confidence: u32) -> ConfidencePick {
        ConfidencePick {
            user_id: user.to_string(),
            week: 1,
            game_id: game_id.to_string(),
            team: normalize(team),
            confidence,
        }
    }

    #[test]
    fn correct_picks_earn_confidence() {
        let games = vec![
            game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills")),
            game("102", "Dallas Cowboys", "New York Giants", Some("New York Giants")),
        ];
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 2),
            pick("u1", "102", "Dallas Cowboys", 1),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        assert_eq!(scored.scores.len(), 1);
        let s = &scored.scores[0];
        assert_eq!(s.total_points, 2);
        assert_eq!(s.correct_picks, 1);
        assert_eq!(s.total_picks, 2);
        assert_eq!(s.accuracy, 50.0);
        assert!(scored.flags.is_empty());
    }

    #[test]
    fn normalized_names_match_across_spellings() {
        let games = vec![game("101", "LA Rams", "SEA", Some("LA Rams"))];
        let picks = vec![pick("u1", "101", "Los Angeles Rams", 1)];
        let scored = score_week(1, &picks, &games).unwrap();
        assert_eq!(scored.scores[0].total_points, 1);
    }

    #[test]
    fn duplicate_pick_keeps_first_and_flags() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"))];
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 2),
            pick("u1", "101", "Buffalo Bills", 4),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        // Never 6: exactly one of the duplicates scores.
        assert_eq!(scored.scores[0].total_points, 2);
        assert!(matches!(
            scored.flags[0],
            Flag::DuplicatePick { kept_confidence: 2, dropped_confidence: 4, .. }
        ));
    }

    #[test]
    fn non_permutation_flagged_but_scored() {
        let games = vec![
            game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills")),
            game("102", "Dallas Cowboys", "New York Giants", Some("Dallas Cowboys")),
        ];
        // Confidences {3, 3} instead of {1, 2}.
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 3),
            pick("u1", "102", "Dallas Cowboys", 3),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        assert_eq!(scored.scores[0].total_points, 6);
        assert!(scored
            .flags
            .iter()
            .any(|f| matches!(f, Flag::ConfidenceNotPermutation { .. })));
    }

    #[test]
    fn tie_game_scores_nobody() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", None)];
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 1),
            pick("u2", "101", "Miami Dolphins", 1),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        for s in &scored.scores {
            assert_eq!(s.total_points, 0);
            assert_eq!(s.correct_picks, 0);
            assert_eq!(s.total_picks, 1);
        }
    }

    #[test]
    fn pending_pick_counts_in_accuracy_denominator() {
        let mut in_progress = game("102", "Dallas Cowboys", "New York Giants", None);
        in_progress.status = GameStatus::InProgress;
        let games = vec![
            game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills")),
            in_progress,
        ];
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 2),
            pick("u1", "102", "Dallas Cowboys", 1),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        let s = &scored.scores[0];
        // A real submitted pick on a not-yet-final game sits in the
        // denominator already; it just cannot earn or be correct yet.
        assert_eq!(s.pending_picks, 1);
        assert_eq!(s.total_picks, 2);
        assert_eq!(s.correct_picks, 1);
        assert_eq!(s.total_points, 2);
        assert_eq!(s.accuracy, 50.0);
    }

    #[test]
    fn unresolved_game_counts_against_accuracy() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"))];
        let picks = vec![
            pick("u1", "101", "Buffalo Bills", 2),
            pick("u1", "999", "Denver Broncos", 1),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        let s = &scored.scores[0];
        assert_eq!(s.total_picks, 2);
        assert_eq!(s.correct_picks, 1);
        assert_eq!(s.accuracy, 50.0);
        assert!(scored
            .flags
            .iter()
            .any(|f| matches!(f, Flag::UnresolvedGame { .. })));
    }

    #[test]
    fn mismatched_week_pick_flagged_not_dropped() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"))];
        // A document mis-filed under week 1 whose picks say week 2.
        let mut stray = pick("u1", "101", "Buffalo Bills", 1);
        stray.week = 2;
        let scored = score_week(1, std::slice::from_ref(&stray), &games).unwrap();
        assert!(scored.scores.is_empty());
        assert!(matches!(
            scored.flags[0],
            Flag::PickWeekMismatch { week: 1, pick_week: 2, .. }
        ));
    }

    #[test]
    fn picks_without_games_is_an_error() {
        let picks = vec![pick("u1", "101", "Buffalo Bills", 1)];
        let err = score_week(1, &picks, &[]).unwrap_err();
        assert!(matches!(err, PoolError::NoGamesForWeek { week: 1 }));
    }

    #[test]
    fn game_from_wrong_week_is_an_error() {
        let mut g = game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"));
        g.week = 2;
        let err = score_week(1, &[], &[g]).unwrap_err();
        assert!(matches!(err, PoolError::GameWeekMismatch { .. }));
    }

    #[test]
    fn no_picks_no_scores() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"))];
        let scored = score_week(1, &[], &games).unwrap();
        assert!(scored.scores.is_empty());
        assert!(scored.flags.is_empty());
    }

    #[test]
    fn accuracy_rounds_to_one_decimal() {
        assert_eq!(accuracy(1, 3), 33.3);
        assert_eq!(accuracy(2, 3), 66.7);
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(5, 5), 100.0);
    }

    #[test]
    fn scores_ordered_by_user_id() {
        let games = vec![game("101", "Buffalo Bills", "Miami Dolphins", Some("Buffalo Bills"))];
        let picks = vec![
            pick("zeta", "101", "Buffalo Bills", 1),
            pick("alpha", "101", "Miami Dolphins", 1),
        ];
        let scored = score_week(1, &picks, &games).unwrap();
        let ids: Vec<&str> = scored.scores.iter().map(|s| s.user_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
