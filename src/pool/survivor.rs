// Survivor pool reconciliation: replays each user's pick history in week
// order and derives alive/eliminated status from game results alone.
// Elimination is terminal. Anomalies become flags, never silent repairs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::flags::Flag;
use super::game::Game;
use super::picks::SurvivorPick;
use super::PoolError;

/// What to do when a user submits no pick for a completed week.
/// House rules differ; the default keeps the user alive and reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissedPickPolicy {
    #[default]
    StayAlive,
    Eliminate,
}

/// Derived survivor standing for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivorStatus {
    pub user_id: String,
    pub alive: bool,
    /// Week the user went out, when eliminated.
    pub eliminated_week: Option<u32>,
    /// Team whose loss eliminated the user. `None` when eliminated for a
    /// missed pick under [`MissedPickPolicy::Eliminate`].
    pub eliminating_team: Option<String>,
    pub picks_made: u32,
}

impl SurvivorStatus {
    fn alive(user_id: &str, picks_made: u32) -> Self {
        SurvivorStatus {
            user_id: user_id.to_string(),
            alive: true,
            eliminated_week: None,
            eliminating_team: None,
            picks_made,
        }
    }
}

/// Full survivor reconciliation output.
#[derive(Debug, Clone)]
pub struct SurvivorReport {
    pub through_week: u32,
    pub statuses: Vec<SurvivorStatus>,
    pub flags: Vec<Flag>,
}

/// Reconcile survivor status for every rostered user through `through_week`.
///
/// Weeks are replayed in ascending order and elimination is terminal: picks
/// after a user's elimination week are ignored. A pick whose team no game
/// that week involves leaves the week unresolved (flagged, user stays
/// alive). A tie survives. A missed pick in a completed week follows
/// `policy`. Repeated teams across the full submitted history are flagged
/// but never auto-eliminated. Deterministic, statuses ordered by user id.
pub fn compute_status(
    user_ids: &[String],
    picks: &[SurvivorPick],
    games: &[Game],
    through_week: u32,
    policy: MissedPickPolicy,
) -> Result<SurvivorReport, PoolError> {
    let mut games_by_week: BTreeMap<u32, Vec<&Game>> = BTreeMap::new();
    for game in games {
        games_by_week.entry(game.week).or_default().push(game);
    }

    // Picks in a week with no supplied games cannot be reconciled at all.
    for pick in picks {
        if pick.week <= through_week && !games_by_week.contains_key(&pick.week) {
            return Err(PoolError::NoGamesForWeek { week: pick.week });
        }
    }

    let mut flags = Vec::new();
    let mut statuses = Vec::with_capacity(user_ids.len());

    let mut sorted_users: Vec<&String> = user_ids.iter().collect();
    sorted_users.sort();
    sorted_users.dedup();

    for user_id in sorted_users {
        let mut user_picks: BTreeMap<u32, &SurvivorPick> = BTreeMap::new();
        for pick in picks.iter().filter(|p| &p.user_id == user_id) {
            user_picks.entry(pick.week).or_insert(pick);
        }

        // Repeated teams over the whole submitted history, eliminated or not.
        let mut weeks_by_team: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for (week, pick) in user_picks.iter().filter(|(w, _)| **w <= through_week) {
            weeks_by_team.entry(pick.team.as_str()).or_default().push(*week);
        }
        for (team, weeks) in &weeks_by_team {
            if weeks.len() > 1 {
                flags.push(Flag::RepeatedSurvivorTeam {
                    user_id: user_id.clone(),
                    team: team.to_string(),
                    weeks: weeks.clone(),
                });
            }
        }

        let picks_made = user_picks.iter().filter(|(w, _)| **w <= through_week).count() as u32;
        let mut status = SurvivorStatus::alive(user_id, picks_made);

        for week in 1..=through_week {
            let week_games = match games_by_week.get(&week) {
                Some(games) => games,
                None => continue,
            };
            let pick = match user_picks.get(&week) {
                Some(pick) => *pick,
                None => {
                    // Missed picks only matter once the week has concluded.
                    if week_games.iter().all(|g| g.is_final()) {
                        flags.push(Flag::MissedPick {
                            user_id: user_id.clone(),
                            week,
                        });
                        if policy == MissedPickPolicy::Eliminate {
                            status.alive = false;
                            status.eliminated_week = Some(week);
                            break;
                        }
                    }
                    continue;
                }
            };

            let game = match week_games.iter().find(|g| g.involves(&pick.team)) {
                Some(game) => *game,
                None => {
                    flags.push(Flag::UnresolvedTeam {
                        user_id: user_id.clone(),
                        week,
                        team: pick.team.clone(),
                    });
                    continue;
                }
            };
            if !game.is_final() {
                continue;
            }
            // A tie eliminates no one.
            if let Some(winner) = game.final_winner() {
                if super::teams::normalize(winner) != pick.team {
                    status.alive = false;
                    status.eliminated_week = Some(week);
                    status.eliminating_team = Some(pick.team.clone());
                    break;
                }
            }
        }

        statuses.push(status);
    }

    Ok(SurvivorReport {
        through_week,
        statuses,
        flags,
    })
}
