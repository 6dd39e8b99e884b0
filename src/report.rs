// Report output: CSV exports and plain-text tables for season standings
// and the survivor report.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pool::standings::SeasonStanding;
use crate::pool::survivor::SurvivorStatus;

/// One row of the standings CSV.
#[derive(Debug, Serialize)]
struct StandingsRow<'a> {
    rank: u32,
    user_id: &'a str,
    display_name: &'a str,
    total_points: u32,
    correct_picks: u32,
    total_picks: u32,
    accuracy: f64,
}

/// One row of the survivor CSV.
#[derive(Debug, Serialize)]
struct SurvivorRow<'a> {
    user_id: &'a str,
    display_name: &'a str,
    alive: bool,
    eliminated_week: Option<u32>,
    eliminating_team: Option<&'a str>,
    picks_made: u32,
}

/// Write ranked standings to `path` as CSV, creating parent directories as
/// needed. `names` maps user ids to display names; unknown ids fall back to
/// the id itself.
pub fn export_standings(
    path: &Path,
    standings: &[SeasonStanding],
    names: &HashMap<String, String>,
) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for standing in standings {
        writer
            .serialize(StandingsRow {
                rank: standing.rank,
                user_id: &standing.user_id,
                display_name: display_name(names, &standing.user_id),
                total_points: standing.total_points,
                correct_picks: standing.correct_picks,
                total_picks: standing.total_picks,
                accuracy: standing.accuracy,
            })
            .context("failed to write standings row")?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the survivor report to `path` as CSV.
pub fn export_survivor(
    path: &Path,
    statuses: &[SurvivorStatus],
    names: &HashMap<String, String>,
) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for status in statuses {
        writer
            .serialize(SurvivorRow {
                user_id: &status.user_id,
                display_name: display_name(names, &status.user_id),
                alive: status.alive,
                eliminated_week: status.eliminated_week,
                eliminating_team: status.eliminating_team.as_deref(),
                picks_made: status.picks_made,
            })
            .context("failed to write survivor row")?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

/// Render standings as a fixed-width text table for the terminal.
pub fn render_standings_table(
    standings: &[SeasonStanding],
    names: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<24} {:>6} {:>8} {:>7} {:>7}",
        "Rank", "Player", "Pts", "Correct", "Picks", "Acc%"
    );
    for standing in standings {
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:>6} {:>8} {:>7} {:>7.1}",
            standing.rank,
            display_name(names, &standing.user_id),
            standing.total_points,
            standing.correct_picks,
            standing.total_picks,
            standing.accuracy,
        );
    }
    out
}

/// Render the survivor report as a fixed-width text table.
pub fn render_survivor_table(
    statuses: &[SurvivorStatus],
    names: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<12} {:<8} {:<24}",
        "Player", "Status", "Week", "Eliminated By"
    );
    for status in statuses {
        let (state, week, team) = if status.alive {
            ("alive".to_string(), String::new(), "")
        } else {
            (
                "eliminated".to_string(),
                status
                    .eliminated_week
                    .map(|w| w.to_string())
                    .unwrap_or_default(),
                status.eliminating_team.as_deref().unwrap_or("(no pick)"),
            )
        };
        let _ = writeln!(
            out,
            "{:<24} {:<12} {:<8} {:<24}",
            display_name(names, &status.user_id),
            state,
            week,
            team,
        );
    }
    out
}

fn display_name<'a>(names: &'a HashMap<String, String>, user_id: &'a str) -> &'a str {
    names.get(user_id).map(String::as_str).unwrap_or(user_id)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
