use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

pub type TelemetryResult<T> = std::result::Result<T, TelemetryError>;
