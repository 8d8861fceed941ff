use std::{path::PathBuf, sync::OnceLock};

use config::{Config, File};
use log::LevelFilter;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The configuration has already been initialized")]
    ConfigAlreadyInitialized,

    #[error("The configuration has not been initialized")]
    ConfigNotInitialized,

    #[error("Unable to read the configuration file: {0}")]
    UnableToReadConfig(#[from] config::ConfigError),

    #[error("Invalid log level: {0:?}")]
    InvalidLogLevel(String),
}

/// Configuration for the chess rules tools
#[derive(Debug, serde::Deserialize)]
pub struct ChessRulesConfig {
    /// Number of threads to use for the perft command
    pub perft_threads: u32,

    /// Maximum level of the messages written to the terminal (off, error, warn, info, debug or trace)
    pub log_level: String,
}

impl ChessRulesConfig {
    /// Returns the configured log level.
    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level.parse().map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

static CONFIG: OnceLock<ChessRulesConfig> = OnceLock::new();

/// Get the configuration
pub fn get_config() -> Result<&'static ChessRulesConfig, ConfigError> {
    CONFIG.get().ok_or(ConfigError::ConfigNotInitialized)
}

/// Reads the configuration file, falling back on defaults for every missing value. The file itself is optional.
fn read_config(path: PathBuf) -> Result<ChessRulesConfig, ConfigError> {
    let settings = Config::builder()
        .set_default("perft_threads", 1_i64)?
        .set_default("log_level", "info")?
        .add_source(File::from(path).required(false))
        .build()?;
    let config: ChessRulesConfig = settings.try_deserialize()?;
    config.log_level_filter()?;

    Ok(config)
}

/// Initialize the configuration
pub fn initialize(path: PathBuf) -> Result<(), ConfigError> {
    let config = read_config(path)?;
    CONFIG.set(config).map_err(|_| ConfigError::ConfigAlreadyInitialized)?;

    Ok(())
}
