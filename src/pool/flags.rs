// Structured diagnostic flags: every data anomaly the engine tolerates is
// reported here as data rather than console text, so admin tooling can
// surface or act on it. Flags never change a computed result on their own.

use serde::{Deserialize, Serialize};

/// One detected data anomaly. The engine computes a best-effort
/// deterministic result and attaches these; it never silently repairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Flag {
    /// More than one confidence pick for the same game in one user-week.
    /// Exactly one was kept per the documented precedence rule.
    DuplicatePick {
        user_id: String,
        week: u32,
        game_id: String,
        kept_confidence: u32,
        dropped_confidence: u32,
    },

    /// More than one survivor pick document for the same user-week;
    /// the first submitted was kept.
    DuplicateSurvivorPick { user_id: String, week: u32 },

    /// The surviving confidence values for a week are not a permutation
    /// of 1..=N where N is the number of games that week.
    ConfidenceNotPermutation {
        user_id: String,
        week: u32,
        confidences: Vec<u32>,
        expected_games: usize,
    },

    /// A pick document missing a required field (team or usable
    /// confidence). The record was excluded from all aggregates.
    MalformedPick {
        user_id: String,
        week: u32,
        detail: String,
    },

    /// A confidence pick references a game id absent from the week's
    /// game set. Counted in the denominator, earns nothing.
    UnresolvedGame {
        user_id: String,
        week: u32,
        game_id: String,
    },

    /// A pick's own week disagrees with the week being scored: a mis-keyed
    /// document. Excluded from this week's aggregates, never re-keyed.
    PickWeekMismatch {
        user_id: String,
        week: u32,
        pick_week: u32,
        game_id: String,
    },

    /// A survivor pick names a team no game in that week involves.
    /// The week is unresolvable: no elimination, no survival credit.
    UnresolvedTeam {
        user_id: String,
        week: u32,
        team: String,
    },

    /// The same normalized team appears in two or more weeks of one
    /// user's survivor history. Reported, never auto-resolved.
    RepeatedSurvivorTeam {
        user_id: String,
        team: String,
        weeks: Vec<u32>,
    },

    /// No survivor pick exists for a completed week.
    MissedPick { user_id: String, week: u32 },
}
