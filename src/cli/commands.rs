//! CLI command implementations
//!
//! `init` creates the database file and schema without serving.
//! `start` boots the store and serves HTTP until a shutdown signal,
//! then drains the pending writes before exiting.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::NoteDatabase;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{Event, Logger};
use crate::store::NoteStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Milliseconds between background flush cycles
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_db_path() -> String {
    "./notedb.sqlite".to_string()
}

fn default_flush_interval_ms() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            flush_interval_ms: default_flush_interval_ms(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults when
    /// the file does not exist. A file that exists but does not parse
    /// or validate is an error, never silently replaced.
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            Logger::warn(
                Event::ConfigDefaulted,
                &[("path", &path.display().to_string())],
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Logger::info(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.db_path.is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }

        if self.flush_interval_ms == 0 {
            return Err(CliError::config_error("flush_interval_ms must be > 0"));
        }

        if self.http.host.is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        if self.http.page_size == 0 {
            return Err(CliError::config_error("http.page_size must be > 0"));
        }

        Ok(())
    }

    /// Flush interval as a Duration
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
    }
}

/// Create the database file and schema
///
/// Idempotent: running against an existing database leaves it
/// untouched. Writes the default config file when none exists so a
/// later `start` picks up the same paths.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;

    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::config_error(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }
    }

    let db = NoteDatabase::open(&config.db_path)
        .map_err(|e| CliError::boot_failed(format!("Failed to open database: {}", e)))?;

    if !config_path.exists() {
        fs::write(config_path, serde_json::to_string_pretty(&config)?)?;
    }

    println!(
        "{}",
        json!({"initialized": true, "db_path": db.path().display().to_string()})
    );

    Ok(())
}

/// Start the note server
///
/// Boot sequence: load config, open the store (full table load plus
/// flusher spawn), serve HTTP. On shutdown the HTTP server drains
/// first, then the store flushes whatever is still pending.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    Logger::info(Event::StartupBegin, &[]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = NoteStore::open(&config.db_path, config.flush_interval())
            .await
            .map_err(|e| {
                Logger::fatal(Event::StartupFailed, &[("error", &e.to_string())]);
                CliError::boot_failed(format!("Failed to open store: {}", e))
            })?;

        let server = HttpServer::new(config.http.clone(), store.clone());
        Logger::info(Event::StartupComplete, &[("addr", &server.socket_addr())]);

        // Close the store even when the server fails, so writes that
        // were accepted still reach disk.
        let served = server.start().await;
        let closed = store.close().await;

        served.map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))?;
        closed.map_err(|e| CliError::shutdown_failed(format!("Failed to close store: {}", e)))?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::store::{Note, PendingWrite, WriteLog};

    fn create_config(dir: &TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("notedb.json");
        let db_path = dir.path().join("data").join("notes.sqlite");

        let config = json!({
            "db_path": db_path.to_string_lossy()
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_init_creates_database_and_schema() {
        let dir = TempDir::new().unwrap();
        let config_path = create_config(&dir);
        let db_path = dir.path().join("data").join("notes.sqlite");

        init(&config_path).unwrap();

        assert!(db_path.exists());
        // The schema is queryable straight away
        let db = NoteDatabase::open(&db_path).unwrap();
        assert!(db.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_init_twice_preserves_database_and_config() {
        let dir = TempDir::new().unwrap();
        let config_path = create_config(&dir);
        let db_path = dir.path().join("data").join("notes.sqlite");

        init(&config_path).unwrap();

        // A row written between runs must survive the second init
        {
            let db = NoteDatabase::open(&db_path).unwrap();
            let mut batch = WriteLog::new();
            batch.record(1, PendingWrite::Upsert(Note::new(1, "keep", "me")));
            db.apply_batch(&batch).unwrap();
        }
        let config_before = fs::read_to_string(&config_path).unwrap();

        init(&config_path).unwrap();

        assert_eq!(fs::read_to_string(&config_path).unwrap(), config_before);
        let db = NoteDatabase::open(&db_path).unwrap();
        assert_eq!(db.load_all().unwrap(), vec![Note::new(1, "keep", "me")]);
    }

    #[test]
    fn test_run_command_dispatches_init() {
        let dir = TempDir::new().unwrap();
        let config_path = create_config(&dir);

        run_command(Command::Init {
            config: config_path,
        })
        .unwrap();

        assert!(dir.path().join("data").join("notes.sqlite").exists());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.db_path, "./notedb.sqlite");
        assert_eq!(config.flush_interval_ms, 5000);
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"db_path": "/tmp/n.sqlite"}"#).unwrap();
        assert_eq!(config.db_path, "/tmp/n.sqlite");
        assert_eq!(config.flush_interval_ms, 5000);
        assert_eq!(config.http.page_size, 10);
    }

    #[test]
    fn test_load_or_default_with_absent_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.db_path, "./notedb.sqlite");
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notedb.json");
        fs::write(&path, "{not json").unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_db_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notedb.json");
        fs::write(&path, r#"{"db_path": ""}"#).unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_flush_interval() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notedb.json");
        fs::write(&path, r#"{"flush_interval_ms": 0}"#).unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notedb.json");
        fs::write(&path, r#"{"http": {"page_size": 0}}"#).unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }

    #[test]
    fn test_flush_interval_duration() {
        let config = Config {
            flush_interval_ms: 250,
            ..Config::default()
        };
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
    }
}
