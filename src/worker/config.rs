use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub tick_seconds: u64,
    pub probe_timeout_ms: u64,
    pub max_db_connections: u32,
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialWorkerConfig {
    database_url: Option<String>,
    tick_seconds: Option<u64>,
    probe_timeout_ms: Option<u64>,
    max_db_connections: Option<u32>,
    log_dir: Option<String>,
}

fn default_tick_seconds() -> u64 {
    60
}

fn default_probe_timeout_ms() -> u64 {
    15_000
}

fn default_max_db_connections() -> u32 {
    10
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl WorkerConfig {
    /// Loads the configuration: an optional TOML file layered under
    /// environment variables, with environment taking precedence.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        let file_config = match config_path {
            Some(path_str) => parse_file(Path::new(path_str))?,
            None => PartialWorkerConfig::default(),
        };
        let env_config = PartialWorkerConfig::from_env()?;
        Self::merge(file_config, env_config)
    }

    fn merge(file: PartialWorkerConfig, env: PartialWorkerConfig) -> Result<Self, String> {
        let config = WorkerConfig {
            database_url: env
                .database_url
                .or(file.database_url)
                .ok_or("DATABASE_URL is required")?,
            tick_seconds: env
                .tick_seconds
                .or(file.tick_seconds)
                .unwrap_or_else(default_tick_seconds),
            probe_timeout_ms: env
                .probe_timeout_ms
                .or(file.probe_timeout_ms)
                .unwrap_or_else(default_probe_timeout_ms),
            max_db_connections: env
                .max_db_connections
                .or(file.max_db_connections)
                .unwrap_or_else(default_max_db_connections),
            log_dir: env.log_dir.or(file.log_dir).unwrap_or_else(default_log_dir),
        };

        if config.tick_seconds == 0 {
            return Err("tick_seconds must be positive".to_string());
        }
        if config.probe_timeout_ms == 0 {
            return Err("probe_timeout_ms must be positive".to_string());
        }

        Ok(config)
    }
}

impl PartialWorkerConfig {
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            tick_seconds: parse_env("TICK_SECONDS")?,
            probe_timeout_ms: parse_env("PROBE_TIMEOUT_MS")?,
            max_db_connections: parse_env("MAX_DB_CONNECTIONS")?,
            log_dir: env::var("LOG_DIR").ok(),
        })
    }
}

fn parse_file(path: &Path) -> Result<PartialWorkerConfig, String> {
    if !path.exists() {
        return Ok(PartialWorkerConfig::default());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
    toml::from_str(&contents)
        .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, String> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{key} must be a valid number, got {raw:?}")),
        Err(_) => Ok(None),
    }
}
