//! Logging setup for CareCost binaries
//!
//! Library crates only emit `tracing` events. The server and CLI call
//! [`init_tracing`] once at startup to install a subscriber:
//! - `RUST_LOG`, when set, decides filtering
//! - otherwise the configured level applies to CareCost crates
//! - `pretty` writes coloured lines, `json` writes one flattened object per event

pub mod error;
pub mod format;

pub use error::*;

use config_engine::{LogFormat, LoggingSettings};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::format::ColoredFormatter;

const CARECOST_TARGETS: [&str; 4] = [
    "carecost_server",
    "carecost",
    "liability_engine",
    "price_catalog",
];

/// Default filter directives for `settings`, with `verbose` forcing debug
pub fn default_directives(settings: &LoggingSettings, verbose: bool) -> String {
    let level = if verbose {
        "debug".to_string()
    } else {
        settings.level.to_ascii_lowercase()
    };

    let mut directives: Vec<String> = CARECOST_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    directives.push("tower_http=info".to_string());
    directives.join(",")
}

/// `RUST_LOG` if set and valid, else [`default_directives`]
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the default directives do
/// not parse, which means the configured level is unknown.
pub fn build_env_filter(settings: &LoggingSettings, verbose: bool) -> TelemetryResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directives(settings, verbose))
        .map_err(|err| TelemetryError::InvalidFilter(err.to_string()))
}

/// Install the global subscriber, writing to stdout
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInitialized`] on a second call and
/// [`TelemetryError::InvalidFilter`] for an unusable level.
pub fn init_tracing(settings: &LoggingSettings, verbose: bool) -> TelemetryResult<()> {
    init_tracing_with_writer(settings, verbose, std::io::stdout)
}

/// Install the global subscriber with a custom writer, e.g. `std::io::stderr`
/// for command-line tools whose stdout carries results
///
/// # Errors
///
/// Same as [`init_tracing`].
pub fn init_tracing_with_writer<W>(
    settings: &LoggingSettings,
    verbose: bool,
    writer: W,
) -> TelemetryResult<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let env_filter = build_env_filter(settings, verbose)?;

    let result = match settings.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(true)
                    .event_format(ColoredFormatter),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json()
                    .flatten_event(true),
            )
            .try_init(),
    };

    result.map_err(|_| TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_use_configured_level() {
        let settings = LoggingSettings {
            level: "WARN".to_string(),
            format: LogFormat::Json,
        };
        assert_eq!(
            default_directives(&settings, false),
            "carecost_server=warn,carecost=warn,liability_engine=warn,price_catalog=warn,tower_http=info"
        );
    }

    #[test]
    fn test_verbose_forces_debug() {
        let directives = default_directives(&LoggingSettings::default(), true);
        assert!(directives.starts_with("carecost_server=debug,"));
        assert!(directives.contains("price_catalog=debug"));
    }

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives(&LoggingSettings::default(), false);
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_second_init_is_rejected() {
        let settings = LoggingSettings::default();
        assert!(init_tracing(&settings, false).is_ok());
        assert!(matches!(
            init_tracing(&settings, false),
            Err(TelemetryError::AlreadyInitialized)
        ));
    }
}
