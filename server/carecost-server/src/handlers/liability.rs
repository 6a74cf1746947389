use axum::{extract::rejection::JsonRejection, Json};
use liability_engine::{compute, LiabilityInput, LiabilityResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::validation::RequestValidation;
use crate::{validate_amount, validate_range};

/// Raw liability request, amounts in dollars
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct LiabilityRequest {
    #[schema(example = 25000.0)]
    pub negotiated_rate: f64,
    #[schema(example = 5000.0)]
    pub remaining_deductible: f64,
    /// Fraction in `[0, 1]`, e.g. `0.2` for 20%
    #[schema(example = 0.2)]
    pub coinsurance_rate: f64,
    #[schema(example = 10000.0)]
    pub out_of_pocket_max_remaining: f64,
}

impl RequestValidation for LiabilityRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_amount!("negotiated_rate", self.negotiated_rate);
        validate_amount!("remaining_deductible", self.remaining_deductible);
        validate_range!("coinsurance_rate", self.coinsurance_rate, 0.0, 1.0);
        validate_amount!("out_of_pocket_max_remaining", self.out_of_pocket_max_remaining);
        Ok(())
    }
}

impl LiabilityRequest {
    /// Checked calculator input
    ///
    /// # Errors
    ///
    /// Returns a field validation error for any value outside its domain.
    pub fn to_input(&self) -> Result<LiabilityInput, ApiError> {
        self.validate()?;
        Ok(LiabilityInput::from_f64(
            self.negotiated_rate,
            self.remaining_deductible,
            self.coinsurance_rate,
            self.out_of_pocket_max_remaining,
        )?)
    }
}

/// Compute patient liability for a single claim
#[utoipa::path(
    post,
    path = "/api/v1/liability",
    tag = "liability",
    request_body = LiabilityRequest,
    responses(
        (status = 200, description = "Liability computed", body = LiabilityResult),
        (status = 400, description = "Invalid input", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn estimate_liability(
    payload: Result<Json<LiabilityRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LiabilityResult>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let input = request.to_input()?;
    let result = compute(&input);

    tracing::debug!(
        negotiated_rate = %input.negotiated_rate(),
        total_liability = %result.total_liability,
        cap_applied = result.out_of_pocket_cap_applied,
        "Liability computed"
    );

    Ok(Json(api_success(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::codes;
    use rust_decimal_macros::dec;

    fn request(rate: f64, deductible: f64, coinsurance: f64, oop: f64) -> LiabilityRequest {
        LiabilityRequest {
            negotiated_rate: rate,
            remaining_deductible: deductible,
            coinsurance_rate: coinsurance,
            out_of_pocket_max_remaining: oop,
        }
    }

    fn field_of(err: &ApiError) -> String {
        match err {
            ApiError::Validation {
                field_errors: Some(fields),
                ..
            } => fields.keys().next().cloned().unwrap(),
            other => panic!("expected field validation, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_converts_exactly() {
        let input = request(25_000.0, 5_000.0, 0.2, 10_000.0).to_input().unwrap();
        assert_eq!(input.coinsurance_rate(), dec!(0.2));
        assert_eq!(compute(&input).total_liability, dec!(9000));
    }

    #[test]
    fn test_negative_amount_names_field() {
        let err = request(1_000.0, -1.0, 0.2, 5_000.0).to_input().unwrap_err();
        assert_eq!(field_of(&err), "remaining_deductible");
        assert_eq!(err.code(), codes::validation::NEGATIVE_AMOUNT);
    }

    #[test]
    fn test_coinsurance_above_one_is_rejected() {
        let err = request(1_000.0, 0.0, 1.5, 5_000.0).to_input().unwrap_err();
        assert_eq!(field_of(&err), "coinsurance_rate");
        assert_eq!(err.code(), codes::validation::RATE_OUT_OF_RANGE);
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let err = request(f64::NAN, 0.0, 0.2, 5_000.0).to_input().unwrap_err();
        assert_eq!(field_of(&err), "negotiated_rate");
        assert_eq!(err.code(), codes::validation::NON_FINITE_NUMBER);
    }

    #[test]
    fn test_unrepresentable_magnitude_is_rejected() {
        let err = request(1e300, 0.0, 0.2, 5_000.0).to_input().unwrap_err();
        assert_eq!(field_of(&err), "negotiated_rate");
    }
}
