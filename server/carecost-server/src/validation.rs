//! Request validation shared by the handlers
//!
//! Payloads implement [`RequestValidation`]; the macros below return early
//! with a field-attributed [`ApiError`] on the first failed rule.

use crate::error::ApiError;

/// Trait for validating request payloads before they reach the engine
///
/// # Example
///
/// ```rust
/// use carecost_server::error::ApiError;
/// use carecost_server::validation::RequestValidation;
/// use carecost_server::validate_field;
///
/// struct RateRequest {
///     negotiated_rate: f64,
/// }
///
/// impl RequestValidation for RateRequest {
///     fn validate(&self) -> Result<(), ApiError> {
///         validate_field!(
///             "negotiated_rate",
///             self.negotiated_rate >= 0.0,
///             "negotiated_rate must be non-negative"
///         );
///         Ok(())
///     }
/// }
///
/// assert!(RateRequest { negotiated_rate: -1.0 }.validate().is_err());
/// ```
pub trait RequestValidation {
    /// # Errors
    ///
    /// Returns a validation [`ApiError`] naming the first offending field.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Fail with a field error unless `$predicate` holds
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::field_validation(
                $field,
                $message,
                ::error_common::codes::validation::INVALID_INPUT,
            ));
        }
    };
}

/// Fail unless `$value` is finite and within `[$min, $max]`
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $value:expr, $min:expr, $max:expr) => {
        if !$value.is_finite() {
            return Err($crate::error::ApiError::field_validation(
                $field,
                format!("{} must be a finite number", $field),
                ::error_common::codes::validation::NON_FINITE_NUMBER,
            ));
        }
        if $value < $min || $value > $max {
            return Err($crate::error::ApiError::field_validation(
                $field,
                format!("{} must be between {} and {}, got {}", $field, $min, $max, $value),
                ::error_common::codes::validation::RATE_OUT_OF_RANGE,
            ));
        }
    };
}

/// Fail unless `$value` is finite and not negative
#[macro_export]
macro_rules! validate_amount {
    ($field:expr, $value:expr) => {
        if !$value.is_finite() {
            return Err($crate::error::ApiError::field_validation(
                $field,
                format!("{} must be a finite number", $field),
                ::error_common::codes::validation::NON_FINITE_NUMBER,
            ));
        }
        if $value < 0.0 {
            return Err($crate::error::ApiError::field_validation(
                $field,
                format!("{} must be non-negative, got {}", $field, $value),
                ::error_common::codes::validation::NEGATIVE_AMOUNT,
            ));
        }
    };
}
