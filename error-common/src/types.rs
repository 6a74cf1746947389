use thiserror::Error;

/// Top-level error for CareCost binaries.
///
/// Library crates keep their own error enums; front ends fold them into
/// this type before reporting.
#[derive(Error, Debug)]
pub enum CareCostError {
    /// Caller supplied input outside the documented domain
    #[error("Validation error: {0}")]
    Validation(String),

    /// A procedure, provider, plan or rate could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server bootstrap or serving errors
    #[error("Server error: {0}")]
    Server(String),

    /// Socket and bind errors
    #[error("Network error: {0}")]
    Network(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CareCostError {
    /// Short machine-readable category, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            CareCostError::Validation(_) => "validation_error",
            CareCostError::NotFound(_) => "not_found",
            CareCostError::Config(_) => "configuration_error",
            CareCostError::Server(_) => "server_error",
            CareCostError::Network(_) => "network_error",
            CareCostError::Internal(_) | CareCostError::Other(_) => "internal_error",
        }
    }

    /// Process exit code for CLI front ends
    pub fn exit_code(&self) -> i32 {
        match self {
            CareCostError::Validation(_) => 2,
            CareCostError::NotFound(_) => 3,
            CareCostError::Config(_) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for CareCost operations
pub type Result<T> = std::result::Result<T, CareCostError>;

/// Log an error as a single structured event
pub fn log_error(context: &str, error: &CareCostError) {
    tracing::error!(
        context = context,
        error_type = error.error_type(),
        error = %error,
        "CareCost error occurred"
    );
}
