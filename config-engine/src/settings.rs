use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use liability_engine::CostSharing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable prefix, e.g. `CARECOST__SERVER__PORT`
pub const ENV_PREFIX: &str = "CARECOST";
const ENV_SEPARATOR: &str = "__";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub catalog: CatalogSettings,
    pub estimate: EstimateDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Where the negotiated-rate catalog comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// YAML catalog file; `None` uses the compiled-in seed catalog
    pub path: Option<PathBuf>,
}

/// Plan standing assumed when a raw estimate leaves a parameter out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateDefaults {
    pub remaining_deductible: Decimal,
    pub coinsurance_percent: Decimal,
    pub out_of_pocket_max_remaining: Decimal,
}

impl Default for EstimateDefaults {
    fn default() -> Self {
        Self {
            remaining_deductible: Decimal::from(2_000),
            coinsurance_percent: Decimal::from(20),
            out_of_pocket_max_remaining: Decimal::from(7_500),
        }
    }
}

impl EstimateDefaults {
    /// The defaults as plan cost-sharing parameters
    pub fn cost_sharing(&self) -> CostSharing {
        CostSharing {
            deductible: self.remaining_deductible,
            coinsurance_percent: self.coinsurance_percent,
            out_of_pocket_max: self.out_of_pocket_max_remaining,
        }
    }
}

impl Settings {
    /// Load settings from built-in defaults, an optional config file and the
    /// environment, in increasing priority. `.env` is read first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if `file` is given but missing,
    /// [`ConfigError::Load`] for unreadable or mistyped values and
    /// [`ConfigError::Validation`] when the result fails [`Settings::validate`].
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
        }
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .separator(ENV_SEPARATOR)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(
            host = %settings.server.host,
            port = settings.server.port,
            catalog = ?settings.catalog.path,
            "Configuration loaded"
        );
        Ok(settings)
    }

    /// Check values that deserialize fine but cannot be used
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the offending key.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".to_string()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "server.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        self.estimate
            .cost_sharing()
            .validate()
            .map_err(|err| ConfigError::Validation(format!("estimate.{err}")))?;
        Ok(())
    }
}
