use std::path::PathBuf;

use error_common::codes;
use liability_engine::LiabilityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("No negotiated rate for CPT {procedure_cpt} at NPI {provider_npi} under plan {plan_slug}")]
    RateNotFound {
        procedure_cpt: String,
        provider_npi: String,
        plan_slug: String,
    },

    #[error("Invalid cost sharing: {0}")]
    CostSharing(#[from] LiabilityError),
}

impl CatalogError {
    /// Standard error code for API and log output
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Io { .. } | CatalogError::Parse(_) => codes::catalog::LOAD_FAILED,
            CatalogError::Invalid(_) => codes::catalog::INVALID_DATA,
            CatalogError::UnknownProcedure(_) => codes::lookup::PROCEDURE_NOT_FOUND,
            CatalogError::UnknownProvider(_) => codes::lookup::PROVIDER_NOT_FOUND,
            CatalogError::UnknownPlan(_) => codes::lookup::PLAN_NOT_FOUND,
            CatalogError::RateNotFound { .. } => codes::lookup::RATE_NOT_FOUND,
            CatalogError::CostSharing(err) => err.code(),
        }
    }

    /// True for lookups that named something the catalog does not hold
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::UnknownProcedure(_)
                | CatalogError::UnknownProvider(_)
                | CatalogError::UnknownPlan(_)
                | CatalogError::RateNotFound { .. }
        )
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
