//! Layered configuration for CareCost
//!
//! Sources, lowest priority first:
//! - built-in defaults
//! - an optional YAML or TOML file (format from the extension)
//! - `.env`, then `CARECOST__SECTION__KEY` environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::Settings;
//!
//! let settings = Settings::load(None)?;
//! println!("listening on {}:{}", settings.server.host, settings.server.port);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod error;
pub mod settings;

pub use error::*;
pub use settings::*;
