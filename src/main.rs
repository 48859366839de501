//! Student Records binary entry point.
//!
//! The menu is written to stdout; logs go to stderr.

use std::io;

use student_records::audit::NoAudit;
use student_records::cli::{App, Console};
use student_records::config::{Backend, Config};
use student_records::error::{AppError, ConfigError};
use student_records::storage::{PostgresStore, SqliteStore};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()));
            tracing::error!("Configuration error: {e}");
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);
    tracing::info!(backend = %config.backend, "student-records starting...");

    if let Err(e) = run(&config).await {
        tracing::error!("Fatal error: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }

    tracing::info!("student-records shutdown complete");
}

/// Initialize logging to stderr only (stdout is for the menu).
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            level
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

async fn run(config: &Config) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    match config.backend {
        Backend::Sqlite => {
            if config.reset_database && SqliteStore::reset(&config.database_path)? {
                console.line("Previous database removed for a clean start.")?;
            }
            let store = SqliteStore::new(&config.database_path).await?;
            let app = App::new(store, NoAudit);
            let result = app.run(&mut console).await;
            app.store().close().await;
            result
        }
        Backend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "DATABASE_URL".into(),
                })?;
            let store = PostgresStore::new(url).await?;
            let app = App::new(store.clone(), store);
            let result = app.run(&mut console).await;
            app.store().close().await;
            result
        }
    }
}
