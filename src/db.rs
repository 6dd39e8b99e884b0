// SQLite persistence layer for users, games, and raw pick documents.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::pool::game::{Game, GameStatus};

/// Which pool a pick document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Confidence,
    Survivor,
}

impl PoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::Confidence => "confidence",
            PoolKind::Survivor => "survivor",
        }
    }
}

/// A registered pool member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub display_name: String,
}

/// SQLite-backed persistence for users, game results, and submitted pick
/// documents. Pick documents are stored verbatim as JSON text and only
/// interpreted by the adapter layer on read, so corrupt submissions survive
/// storage intact and can be flagged rather than lost.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                user_id      TEXT PRIMARY KEY,
                display_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS games (
                game_id    TEXT NOT NULL,
                season     INTEGER NOT NULL,
                week       INTEGER NOT NULL,
                home_team  TEXT NOT NULL,
                away_team  TEXT NOT NULL,
                home_score INTEGER,
                away_score INTEGER,
                status     TEXT NOT NULL,
                winner     TEXT,
                PRIMARY KEY (game_id, season)
            );

            CREATE TABLE IF NOT EXISTS pick_docs (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   TEXT NOT NULL,
                season    INTEGER NOT NULL,
                week      INTEGER NOT NULL,
                pool      TEXT NOT NULL,
                doc       TEXT NOT NULL,
                timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        // Index for the common read path: all docs for one season and pool.
        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_pick_docs_season_pool
                 ON pick_docs(season, pool, week);",
        )
        .context("failed to create pick_docs index")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert a user or update their display name if the id already exists.
    pub fn upsert_user(&self, user_id: &str, display_name: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (user_id, display_name)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name",
            params![user_id, display_name],
        )
        .context("failed to upsert user")?;
        Ok(())
    }

    /// Load all registered users, ordered by id.
    pub fn load_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT user_id, display_name FROM users ORDER BY user_id")
            .context("failed to prepare load_users query")?;

        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    user_id: row.get(0)?,
                    display_name: row.get(1)?,
                })
            })
            .context("failed to query users")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map user rows")?;

        Ok(users)
    }

    /// Look up one user's display name. Returns `None` for unknown ids.
    pub fn display_name(&self, user_id: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let name = conn
            .query_row(
                "SELECT display_name FROM users WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query display name")?;
        Ok(name)
    }

    // ------------------------------------------------------------------
    // Games
    // ------------------------------------------------------------------

    /// Insert or update a game from the external results feed. Re-upserting
    /// the same `(game_id, season)` overwrites scores, status, and winner,
    /// which is how in-progress games become final.
    pub fn upsert_game(&self, season: u32, game: &Game) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO games
                (game_id, season, week, home_team, away_team, home_score, away_score, status, winner)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(game_id, season) DO UPDATE SET
                week       = excluded.week,
                home_team  = excluded.home_team,
                away_team  = excluded.away_team,
                home_score = excluded.home_score,
                away_score = excluded.away_score,
                status     = excluded.status,
                winner     = excluded.winner",
            params![
                game.game_id,
                season,
                game.week,
                game.home_team,
                game.away_team,
                game.home_score,
                game.away_score,
                game.status.as_str(),
                game.winner,
            ],
        )
        .context("failed to upsert game")?;
        Ok(())
    }

    /// Load every game for a season, ordered by week then game id.
    pub fn load_games(&self, season: u32) -> Result<Vec<Game>> {
        self.query_games(
            "SELECT game_id, week, home_team, away_team, home_score, away_score, status, winner
             FROM games WHERE season = ?1 ORDER BY week, game_id",
            params![season],
        )
    }

    /// Load the games for one week of a season, ordered by game id.
    pub fn load_week_games(&self, season: u32, week: u32) -> Result<Vec<Game>> {
        self.query_games(
            "SELECT game_id, week, home_team, away_team, home_score, away_score, status, winner
             FROM games WHERE season = ?1 AND week = ?2 ORDER BY game_id",
            params![season, week],
        )
    }

    fn query_games(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Game>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(sql)
            .context("failed to prepare games query")?;

        let games = stmt
            .query_map(args, |row| {
                let status: String = row.get(6)?;
                Ok(Game {
                    game_id: row.get(0)?,
                    week: row.get(1)?,
                    home_team: row.get(2)?,
                    away_team: row.get(3)?,
                    home_score: row.get(4)?,
                    away_score: row.get(5)?,
                    status: GameStatus::from_str_status(&status),
                    winner: row.get(7)?,
                })
            })
            .context("failed to query games")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map game rows")?;

        Ok(games)
    }

    /// The distinct weeks of a season that have at least one game, ascending.
    pub fn weeks_with_games(&self, season: u32) -> Result<Vec<u32>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT DISTINCT week FROM games WHERE season = ?1 ORDER BY week")
            .context("failed to prepare weeks query")?;

        let weeks = stmt
            .query_map(params![season], |row| row.get(0))
            .context("failed to query weeks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map week rows")?;

        Ok(weeks)
    }

    // ------------------------------------------------------------------
    // Pick documents
    // ------------------------------------------------------------------

    /// Store one submitted pick document verbatim. Duplicate submissions for
    /// the same user-week are deliberately kept; the adapter layer surfaces
    /// them as flags instead of the database silently resolving them.
    pub fn record_pick_doc(
        &self,
        season: u32,
        week: u32,
        user_id: &str,
        pool: PoolKind,
        doc: &serde_json::Value,
    ) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(doc).context("failed to serialize pick document")?;
        conn.execute(
            "INSERT INTO pick_docs (user_id, season, week, pool, doc)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, season, week, pool.as_str(), json_str],
        )
        .context("failed to record pick document")?;
        Ok(())
    }

    /// Load every pick document for a season and pool in submission order.
    /// Rows whose stored text is not valid JSON are returned as JSON strings
    /// so the adapter can flag them instead of this layer dropping them.
    pub fn load_pick_docs(&self, season: u32, pool: PoolKind) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT doc FROM pick_docs
                 WHERE season = ?1 AND pool = ?2 ORDER BY id",
            )
            .context("failed to prepare pick_docs query")?;

        let docs = stmt
            .query_map(params![season, pool.as_str()], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query pick documents")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map pick document rows")?
            .into_iter()
            .map(|json_str| {
                serde_json::from_str(&json_str)
                    .unwrap_or(serde_json::Value::String(json_str))
            })
            .collect();

        Ok(docs)
    }

    /// Load the pick documents for one week of a season and pool.
    pub fn load_week_pick_docs(
        &self,
        season: u32,
        week: u32,
        pool: PoolKind,
    ) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT doc FROM pick_docs
                 WHERE season = ?1 AND week = ?2 AND pool = ?3 ORDER BY id",
            )
            .context("failed to prepare weekly pick_docs query")?;

        let docs = stmt
            .query_map(params![season, week, pool.as_str()], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query weekly pick documents")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map weekly pick document rows")?
            .into_iter()
            .map(|json_str| {
                serde_json::from_str(&json_str)
                    .unwrap_or(serde_json::Value::String(json_str))
            })
            .collect();

        Ok(docs)
    }
}
