// Game records as supplied by the external results feed.

use serde::{Deserialize, Serialize};

use super::teams::normalize;

/// Lifecycle state of a game. `winner` on [`Game`] is meaningful only once
/// the game is `Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    /// Storage string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Final => "final",
        }
    }

    /// Parse a storage string back into a status. Unknown strings map to
    /// `Scheduled`, the conservative reading for a record we cannot trust.
    pub fn from_str_status(s: &str) -> Self {
        match s {
            "final" => GameStatus::Final,
            "in_progress" => GameStatus::InProgress,
            _ => GameStatus::Scheduled,
        }
    }
}

/// A single game for one week. Immutable from the engine's viewpoint;
/// the results feed owns creation and the transition into `Final`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub week: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: GameStatus,
    /// Declared winner, set only when `status == Final`. A `Final` game
    /// with no winner is a tie.
    pub winner: Option<String>,
}

impl Game {
    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    /// `true` when the game ended without a declared winner.
    pub fn is_tie(&self) -> bool {
        self.is_final() && self.winner.is_none()
    }

    /// The winner of a concluded game, if one was declared.
    pub fn final_winner(&self) -> Option<&str> {
        if self.is_final() {
            self.winner.as_deref()
        } else {
            None
        }
    }

    /// Whether this game involves the given team. `team` must already be
    /// normalized; the game's own team names are normalized here.
    pub fn involves(&self, team: &str) -> bool {
        normalize(&self.home_team) == team || normalize(&self.away_team) == team
    }
}
