// Configuration loading and parsing (pool.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pool::survivor::MissedPickPolicy;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// pool.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire pool.toml file.
#[derive(Debug, Clone, Deserialize)]
struct PoolFile {
    pool: PoolSection,
    #[serde(default)]
    confidence: ConfidenceSection,
    #[serde(default)]
    survivor: SurvivorSection,
    #[serde(default)]
    export: ExportSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolSection {
    pub name: String,
    /// Season year, e.g. 2025. Scopes every database read and write.
    pub season: u32,
    /// Number of regular-season weeks.
    pub weeks: u32,
    pub db_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfidenceSection {
    pub enabled: bool,
}

impl Default for ConfidenceSection {
    fn default() -> Self {
        ConfidenceSection { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurvivorSection {
    pub enabled: bool,
    #[serde(default)]
    pub missed_pick_policy: MissedPickPolicy,
}

impl Default for SurvivorSection {
    fn default() -> Self {
        SurvivorSection {
            enabled: true,
            missed_pick_policy: MissedPickPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSection {
    pub standings_csv: String,
    pub survivor_csv: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        ExportSection {
            standings_csv: "exports/standings.csv".to_string(),
            survivor_csv: "exports/survivor.csv".to_string(),
        }
    }
}

/// The assembled configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub pool: PoolSection,
    pub confidence: ConfidenceSection,
    pub survivor: SurvivorSection,
    pub export: ExportSection,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/pool.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let pool_path = base_dir.join("config").join("pool.toml");
    let pool_text = read_file(&pool_path)?;
    let pool_file: PoolFile = toml::from_str(&pool_text).map_err(|e| ConfigError::ParseError {
        path: pool_path.clone(),
        source: e,
    })?;

    let config = Config {
        pool: pool_file.pool,
        confidence: pool_file.confidence,
        survivor: pool_file.survivor,
        export: pool_file.export,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` from `defaults/`: any default file missing from `config/`
/// is copied over, files already present are left untouched, and `.example`
/// templates are skipped. Returns the paths that were newly created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // A hand-maintained config/ is enough to run without defaults/.
        if config_dir.exists() {
            return Ok(vec![]);
        }
        return Err(seed_error(format!(
            "no defaults/ or config/ directory under {}; run from the pool root",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("could not create {}: {e}", config_dir.display())))?;

    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| seed_error(format!("could not read {}: {e}", defaults_dir.display())))?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| seed_error(format!("could not list defaults: {e}")))?;
        if let Some(target) = seed_default_file(&entry.path(), &config_dir)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Copy one default into `config_dir` unless a file of the same name is
/// already there. Returns the created path, or `None` when nothing needed
/// seeding (directories, `.example` templates, files already present).
fn seed_default_file(source: &Path, config_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    if !source.is_file() {
        return Ok(None);
    }
    let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    if name.ends_with(".example") {
        return Ok(None);
    }

    let target = config_dir.join(name);
    // create_new keeps a user-edited pool.toml from being clobbered.
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(source)
                .map_err(|e| seed_error(format!("could not read {}: {e}", source.display())))?;
            std::io::Write::write_all(&mut dest, &content)
                .map_err(|e| seed_error(format!("could not write {}: {e}", target.display())))?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(seed_error(format!("could not seed {}: {e}", target.display()))),
    }
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.pool.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "pool.name".into(),
            message: "must not be empty".into(),
        });
    }

    if !(1..=25).contains(&config.pool.weeks) {
        return Err(ConfigError::ValidationError {
            field: "pool.weeks".into(),
            message: format!("must be between 1 and 25, got {}", config.pool.weeks),
        });
    }

    if !(1990..=2100).contains(&config.pool.season) {
        return Err(ConfigError::ValidationError {
            field: "pool.season".into(),
            message: format!("must be a plausible season year, got {}", config.pool.season),
        });
    }

    if config.pool.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "pool.db_path".into(),
            message: "must not be empty".into(),
        });
    }

    if !config.confidence.enabled && !config.survivor.enabled {
        return Err(ConfigError::ValidationError {
            field: "confidence.enabled".into(),
            message: "at least one of confidence or survivor must be enabled".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
