use std::path::PathBuf;

use error_common::codes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        codes::config::INVALID_CONFIG
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
