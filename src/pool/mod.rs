// Pool engine: team-name normalization, confidence scoring, survivor
// elimination, and season standings. All computations are pure functions
// over in-memory snapshots of picks and games.

pub mod confidence;
pub mod flags;
pub mod game;
pub mod picks;
pub mod standings;
pub mod survivor;
pub mod teams;

use thiserror::Error;

/// Hard errors: precondition violations on a whole scoring call.
/// Per-record data-quality problems are never errors; they are
/// [`flags::Flag`]s attached to a best-effort result.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("week {week} has picks but no games were supplied")]
    NoGamesForWeek { week: u32 },

    #[error("game {game_id} belongs to week {game_week}, not week {week}")]
    GameWeekMismatch {
        game_id: String,
        game_week: u32,
        week: u32,
    },
}
