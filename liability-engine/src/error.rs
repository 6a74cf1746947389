use std::fmt;

use error_common::codes;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Input field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityField {
    NegotiatedRate,
    RemainingDeductible,
    CoinsuranceRate,
    OutOfPocketMaxRemaining,
}

impl LiabilityField {
    pub fn as_str(self) -> &'static str {
        match self {
            LiabilityField::NegotiatedRate => "negotiated_rate",
            LiabilityField::RemainingDeductible => "remaining_deductible",
            LiabilityField::CoinsuranceRate => "coinsurance_rate",
            LiabilityField::OutOfPocketMaxRemaining => "out_of_pocket_max_remaining",
        }
    }
}

impl fmt::Display for LiabilityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract violations rejected at the calculator boundary.
///
/// Inputs are never clamped into range; a caller bug surfaces here instead
/// of as a plausible-looking estimate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiabilityError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: LiabilityField, value: Decimal },

    #[error("{field} must be a finite number")]
    NonFinite { field: LiabilityField },

    #[error("{field} is outside the representable monetary range")]
    Unrepresentable { field: LiabilityField },

    #[error("coinsurance_rate must be between 0 and 1, got {value}")]
    CoinsuranceOutOfRange { value: Decimal },

    #[error("coinsurance percent must be between 0 and 100, got {value}")]
    CoinsurancePercentOutOfRange { value: Decimal },
}

impl LiabilityError {
    /// Field the error refers to
    pub fn field(&self) -> LiabilityField {
        match self {
            LiabilityError::Negative { field, .. }
            | LiabilityError::NonFinite { field }
            | LiabilityError::Unrepresentable { field } => *field,
            LiabilityError::CoinsuranceOutOfRange { .. }
            | LiabilityError::CoinsurancePercentOutOfRange { .. } => LiabilityField::CoinsuranceRate,
        }
    }

    /// Standard error code for API and log output
    pub fn code(&self) -> &'static str {
        match self {
            LiabilityError::Negative { .. } => codes::validation::NEGATIVE_AMOUNT,
            LiabilityError::NonFinite { .. } | LiabilityError::Unrepresentable { .. } => {
                codes::validation::NON_FINITE_NUMBER
            }
            LiabilityError::CoinsuranceOutOfRange { .. }
            | LiabilityError::CoinsurancePercentOutOfRange { .. } => {
                codes::validation::RATE_OUT_OF_RANGE
            }
        }
    }
}

pub type EngineResult<T> = Result<T, LiabilityError>;
