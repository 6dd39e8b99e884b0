// Season orchestration: reads a snapshot of games and pick documents out of
// the store, runs the confidence and survivor engines over it, and assembles
// one report. Every pass recomputes derived results from scratch; nothing
// here mutates stored state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{Database, PoolKind};
use crate::pool::confidence::{score_week, ScoredWeek, WeeklyScore};
use crate::pool::flags::Flag;
use crate::pool::picks::{normalize_confidence_docs, normalize_survivor_docs};
use crate::pool::standings::{aggregate_season, rank_standings, SeasonStanding};
use crate::pool::survivor::{compute_status, SurvivorReport};

/// Everything one reconciliation pass produces.
#[derive(Debug)]
pub struct SeasonReport {
    pub season: u32,
    pub generated_at: DateTime<Utc>,
    /// Per-week confidence results, ascending by week. Empty when the
    /// confidence pool is disabled.
    pub weeks: Vec<ScoredWeek>,
    /// Ranked season standings for the confidence pool.
    pub standings: Vec<SeasonStanding>,
    /// Survivor standings; `None` when the survivor pool is disabled.
    pub survivor: Option<SurvivorReport>,
    /// Every anomaly found across adapters and engines, in detection order.
    /// Flags raised inside the sub-reports are drained into this list.
    pub flags: Vec<Flag>,
}

/// Run a full reconciliation pass for the configured season.
///
/// Per-record data problems surface as [`Flag`]s on the report; only
/// precondition violations (picks in a week with no games at all) and
/// storage failures are errors.
pub fn run(db: &Database, config: &Config) -> Result<SeasonReport> {
    let season = config.pool.season;
    let generated_at = Utc::now();
    let game_weeks = db
        .weeks_with_games(season)
        .context("failed to list season weeks")?;
    info!(season, weeks = game_weeks.len(), "starting reconciliation pass");

    let mut flags = Vec::new();

    let mut weeks = Vec::new();
    if config.confidence.enabled {
        for &week in &game_weeks {
            let games = db
                .load_week_games(season, week)
                .with_context(|| format!("failed to load week {week} games"))?;
            let docs = db
                .load_week_pick_docs(season, week, PoolKind::Confidence)
                .with_context(|| format!("failed to load week {week} confidence documents"))?;
            let (picks, adapter_flags) = normalize_confidence_docs(&docs);
            flags.extend(adapter_flags);

            let mut scored = score_week(week, &picks, &games)
                .with_context(|| format!("confidence scoring failed for week {week}"))?;
            flags.append(&mut scored.flags);
            weeks.push(scored);
        }
    }

    let all_scores: Vec<WeeklyScore> = weeks
        .iter()
        .flat_map(|w| w.scores.iter().cloned())
        .collect();
    let standings = rank_standings(aggregate_season(&all_scores));

    let survivor = if config.survivor.enabled {
        let games = db
            .load_games(season)
            .context("failed to load season games")?;
        let docs = db
            .load_pick_docs(season, PoolKind::Survivor)
            .context("failed to load survivor documents")?;
        let (picks, adapter_flags) = normalize_survivor_docs(&docs);
        flags.extend(adapter_flags);

        // Status is reported for every registered user, plus anyone who
        // submitted a pick without being registered.
        let mut user_ids: Vec<String> = db
            .load_users()
            .context("failed to load users")?
            .into_iter()
            .map(|u| u.user_id)
            .collect();
        user_ids.extend(picks.iter().map(|p| p.user_id.clone()));

        let through_week = game_weeks.last().copied().unwrap_or(0);
        let mut report = compute_status(
            &user_ids,
            &picks,
            &games,
            through_week,
            config.survivor.missed_pick_policy,
        )
        .context("survivor reconciliation failed")?;
        flags.append(&mut report.flags);
        Some(report)
    } else {
        None
    };

    for flag in &flags {
        warn!(?flag, "data anomaly");
    }
    info!(
        scored_weeks = weeks.len(),
        standings = standings.len(),
        flags = flags.len(),
        "reconciliation pass complete"
    );

    Ok(SeasonReport {
        season,
        generated_at,
        weeks,
        standings,
        survivor,
        flags,
    })
}
