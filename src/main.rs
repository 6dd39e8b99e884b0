// Pool engine entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep stdout for the report tables)
// 2. Ensure config files exist, load config
// 3. Open the snapshot database
// 4. Run the season reconciliation pass
// 5. Print standings and survivor tables
// 6. Export CSVs

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use nerdfootball::config;
use nerdfootball::db;
use nerdfootball::report;
use nerdfootball::season;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("pool engine starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: pool={}, season {}, {} weeks",
        config.pool.name, config.pool.season, config.pool.weeks
    );

    let db = db::Database::open(&config.pool.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.pool.db_path);

    let result = season::run(&db, &config).context("season reconciliation failed")?;

    let names: HashMap<String, String> = db
        .load_users()
        .context("failed to load users")?
        .into_iter()
        .map(|u| (u.user_id, u.display_name))
        .collect();

    if config.confidence.enabled {
        println!("{} season {} standings\n", config.pool.name, config.pool.season);
        println!("{}", report::render_standings_table(&result.standings, &names));

        let path = Path::new(&config.export.standings_csv);
        report::export_standings(path, &result.standings, &names)
            .context("failed to export standings")?;
        info!("Standings exported to {}", path.display());
    }

    if let Some(survivor) = &result.survivor {
        println!("Survivor pool through week {}\n", survivor.through_week);
        println!("{}", report::render_survivor_table(&survivor.statuses, &names));

        let path = Path::new(&config.export.survivor_csv);
        report::export_survivor(path, &survivor.statuses, &names)
            .context("failed to export survivor report")?;
        info!("Survivor report exported to {}", path.display());
    }

    if !result.flags.is_empty() {
        println!(
            "{} data anomalies found; see the log for details.",
            result.flags.len()
        );
    }

    info!("pool engine finished");
    Ok(())
}

/// Initialize tracing to log to a file, leaving stdout clean for the tables.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("nerdfootball.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nerdfootball=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
