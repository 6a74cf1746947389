use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{EngineResult, LiabilityError, LiabilityField};

/// Validated calculator input for a single claim.
///
/// Fields are private: the only ways to obtain a value are the checked
/// constructors and `Deserialize`, so `compute` never sees an invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLiabilityInput")]
pub struct LiabilityInput {
    negotiated_rate: Decimal,
    remaining_deductible: Decimal,
    coinsurance_rate: Decimal,
    out_of_pocket_max_remaining: Decimal,
}

/// Unchecked wire shape of [`LiabilityInput`]
#[derive(Debug, Deserialize)]
struct RawLiabilityInput {
    negotiated_rate: Decimal,
    remaining_deductible: Decimal,
    coinsurance_rate: Decimal,
    out_of_pocket_max_remaining: Decimal,
}

impl TryFrom<RawLiabilityInput> for LiabilityInput {
    type Error = LiabilityError;

    fn try_from(raw: RawLiabilityInput) -> Result<Self, Self::Error> {
        LiabilityInput::new(
            raw.negotiated_rate,
            raw.remaining_deductible,
            raw.coinsurance_rate,
            raw.out_of_pocket_max_remaining,
        )
    }
}

impl LiabilityInput {
    /// Build a validated input.
    ///
    /// # Errors
    ///
    /// Returns [`LiabilityError::Negative`] for a negative amount and
    /// [`LiabilityError::CoinsuranceOutOfRange`] for a rate outside `[0, 1]`.
    pub fn new(
        negotiated_rate: Decimal,
        remaining_deductible: Decimal,
        coinsurance_rate: Decimal,
        out_of_pocket_max_remaining: Decimal,
    ) -> EngineResult<Self> {
        Ok(Self {
            negotiated_rate: non_negative(LiabilityField::NegotiatedRate, negotiated_rate)?,
            remaining_deductible: non_negative(
                LiabilityField::RemainingDeductible,
                remaining_deductible,
            )?,
            coinsurance_rate: unit_interval(coinsurance_rate)?,
            out_of_pocket_max_remaining: non_negative(
                LiabilityField::OutOfPocketMaxRemaining,
                out_of_pocket_max_remaining,
            )?,
        })
    }

    /// Build a validated input from floating point values.
    ///
    /// Each float is converted through its shortest round-trip decimal text,
    /// so `0.2` becomes exactly `0.2` rather than its binary approximation.
    ///
    /// # Errors
    ///
    /// Returns [`LiabilityError::NonFinite`] for NaN or infinity,
    /// [`LiabilityError::Unrepresentable`] for magnitudes `Decimal` cannot
    /// hold, and otherwise the same errors as [`LiabilityInput::new`].
    pub fn from_f64(
        negotiated_rate: f64,
        remaining_deductible: f64,
        coinsurance_rate: f64,
        out_of_pocket_max_remaining: f64,
    ) -> EngineResult<Self> {
        Self::new(
            decimal_from_f64(LiabilityField::NegotiatedRate, negotiated_rate)?,
            decimal_from_f64(LiabilityField::RemainingDeductible, remaining_deductible)?,
            decimal_from_f64(LiabilityField::CoinsuranceRate, coinsurance_rate)?,
            decimal_from_f64(
                LiabilityField::OutOfPocketMaxRemaining,
                out_of_pocket_max_remaining,
            )?,
        )
    }

    pub fn negotiated_rate(&self) -> Decimal {
        self.negotiated_rate
    }

    pub fn remaining_deductible(&self) -> Decimal {
        self.remaining_deductible
    }

    pub fn coinsurance_rate(&self) -> Decimal {
        self.coinsurance_rate
    }

    pub fn out_of_pocket_max_remaining(&self) -> Decimal {
        self.out_of_pocket_max_remaining
    }
}

/// Itemised split of a single claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LiabilityBreakdown {
    /// Portion of the patient's total attributed to the deductible
    pub deductible_paid: Decimal,
    /// Portion of the patient's total attributed to coinsurance
    pub coinsurance_paid: Decimal,
    /// Insurer's share: negotiated rate minus patient total
    pub plan_pays: Decimal,
}

/// Calculator output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LiabilityResult {
    /// Total the patient owes for this claim
    pub total_liability: Decimal,
    pub breakdown: LiabilityBreakdown,
    /// True when the out-of-pocket maximum clamped the total
    pub out_of_pocket_cap_applied: bool,
}

/// A plan's published cost-sharing parameters.
///
/// Coinsurance is kept as a whole percentage (`20` for 20%) the way payer
/// plan documents state it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CostSharing {
    pub deductible: Decimal,
    pub coinsurance_percent: Decimal,
    pub out_of_pocket_max: Decimal,
}

impl CostSharing {
    /// Build validated cost-sharing parameters
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts or a percentage outside `[0, 100]`.
    pub fn new(
        deductible: Decimal,
        coinsurance_percent: Decimal,
        out_of_pocket_max: Decimal,
    ) -> EngineResult<Self> {
        let sharing = Self {
            deductible,
            coinsurance_percent,
            out_of_pocket_max,
        };
        sharing.validate()?;
        Ok(sharing)
    }

    /// Check amounts are non-negative and the percentage is in `[0, 100]`
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> EngineResult<()> {
        non_negative(LiabilityField::RemainingDeductible, self.deductible)?;
        percent(self.coinsurance_percent)?;
        non_negative(LiabilityField::OutOfPocketMaxRemaining, self.out_of_pocket_max)?;
        Ok(())
    }

    /// Coinsurance as a fraction (`20` becomes `0.20`)
    pub fn coinsurance_rate(&self) -> Decimal {
        self.coinsurance_percent / Decimal::ONE_HUNDRED
    }

    /// Replace any subset of the parameters with user-supplied values
    pub fn apply(&self, overrides: &PlanOverrides) -> CostSharing {
        CostSharing {
            deductible: overrides.remaining_deductible.unwrap_or(self.deductible),
            coinsurance_percent: overrides
                .coinsurance_percent
                .unwrap_or(self.coinsurance_percent),
            out_of_pocket_max: overrides
                .out_of_pocket_max_remaining
                .unwrap_or(self.out_of_pocket_max),
        }
    }

    /// Calculator input for `negotiated_rate`, treating the deductible and
    /// out-of-pocket maximum as still fully remaining.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter or the rate is out of range.
    pub fn liability_input(&self, negotiated_rate: Decimal) -> EngineResult<LiabilityInput> {
        percent(self.coinsurance_percent)?;
        LiabilityInput::new(
            negotiated_rate,
            self.deductible,
            self.coinsurance_rate(),
            self.out_of_pocket_max,
        )
    }
}

/// User adjustments on top of a plan's typical cost sharing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlanOverrides {
    pub remaining_deductible: Option<Decimal>,
    pub coinsurance_percent: Option<Decimal>,
    pub out_of_pocket_max_remaining: Option<Decimal>,
}

impl PlanOverrides {
    pub fn is_empty(&self) -> bool {
        self.remaining_deductible.is_none()
            && self.coinsurance_percent.is_none()
            && self.out_of_pocket_max_remaining.is_none()
    }
}

fn non_negative(field: LiabilityField, value: Decimal) -> EngineResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(LiabilityError::Negative { field, value });
    }
    Ok(value)
}

fn unit_interval(value: Decimal) -> EngineResult<Decimal> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(LiabilityError::CoinsuranceOutOfRange { value });
    }
    Ok(value)
}

fn percent(value: Decimal) -> EngineResult<Decimal> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(LiabilityError::CoinsurancePercentOutOfRange { value });
    }
    Ok(value)
}

/// Exact decimal for a float, via its shortest round-trip text
///
/// # Errors
///
/// Returns `NonFinite` for NaN/infinity and `Unrepresentable` when the value
/// does not fit a `Decimal`.
fn decimal_from_f64(field: LiabilityField, value: f64) -> EngineResult<Decimal> {
    if !value.is_finite() {
        return Err(LiabilityError::NonFinite { field });
    }
    let decimal = Decimal::from_str(&value.to_string())
        .map_err(|_| LiabilityError::Unrepresentable { field })?;
    // -0.0 would otherwise render as "-0"
    if decimal.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_accepts_boundary_values() {
        let input = LiabilityInput::new(dec!(0), dec!(0), dec!(1), dec!(0)).unwrap();
        assert_eq!(input.coinsurance_rate(), dec!(1));
        assert_eq!(input.negotiated_rate(), Decimal::ZERO);
    }

    #[test]
    fn test_new_rejects_negative_rate() {
        let err = LiabilityInput::new(dec!(-1), dec!(0), dec!(0.2), dec!(0)).unwrap_err();
        assert_eq!(
            err,
            LiabilityError::Negative {
                field: LiabilityField::NegotiatedRate,
                value: dec!(-1)
            }
        );
    }

    #[test]
    fn test_new_rejects_negative_deductible_and_oop() {
        let err = LiabilityInput::new(dec!(10), dec!(-0.01), dec!(0.2), dec!(0)).unwrap_err();
        assert_eq!(err.field(), LiabilityField::RemainingDeductible);

        let err = LiabilityInput::new(dec!(10), dec!(0), dec!(0.2), dec!(-5)).unwrap_err();
        assert_eq!(err.field(), LiabilityField::OutOfPocketMaxRemaining);
    }

    #[test]
    fn test_new_rejects_coinsurance_outside_unit_interval() {
        for bad in [dec!(-0.01), dec!(1.01), dec!(20)] {
            let err = LiabilityInput::new(dec!(10), dec!(0), bad, dec!(100)).unwrap_err();
            assert_eq!(err, LiabilityError::CoinsuranceOutOfRange { value: bad });
        }
    }

    #[test]
    fn test_from_f64_is_exact_for_short_decimals() {
        let input = LiabilityInput::from_f64(25000.0, 5000.0, 0.2, 10000.0).unwrap();
        assert_eq!(input.coinsurance_rate(), dec!(0.2));
        assert_eq!(input.negotiated_rate(), dec!(25000));
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        let err = LiabilityInput::from_f64(f64::NAN, 0.0, 0.2, 0.0).unwrap_err();
        assert_eq!(
            err,
            LiabilityError::NonFinite {
                field: LiabilityField::NegotiatedRate
            }
        );

        let err = LiabilityInput::from_f64(100.0, f64::INFINITY, 0.2, 0.0).unwrap_err();
        assert_eq!(err.field(), LiabilityField::RemainingDeductible);

        let err = LiabilityInput::from_f64(100.0, 0.0, 0.2, f64::NEG_INFINITY).unwrap_err();
        assert_eq!(err.field(), LiabilityField::OutOfPocketMaxRemaining);
    }

    #[test]
    fn test_from_f64_rejects_huge_values() {
        let err = LiabilityInput::from_f64(1e300, 0.0, 0.2, 0.0).unwrap_err();
        assert_eq!(
            err,
            LiabilityError::Unrepresentable {
                field: LiabilityField::NegotiatedRate
            }
        );
    }

    #[test]
    fn test_from_f64_normalises_negative_zero() {
        let input = LiabilityInput::from_f64(-0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(input.negotiated_rate().to_string(), "0");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: LiabilityInput = serde_json::from_str(
            r#"{"negotiated_rate":"1000","remaining_deductible":"2000","coinsurance_rate":"0.30","out_of_pocket_max_remaining":"5000"}"#,
        )
        .unwrap();
        assert_eq!(ok.remaining_deductible(), dec!(2000));

        let bad = serde_json::from_str::<LiabilityInput>(
            r#"{"negotiated_rate":"1000","remaining_deductible":"2000","coinsurance_rate":"1.5","out_of_pocket_max_remaining":"5000"}"#,
        );
        assert!(bad.is_err());
        assert!(bad.unwrap_err().to_string().contains("coinsurance_rate"));
    }

    #[test]
    fn test_cost_sharing_coinsurance_rate() {
        let sharing = CostSharing::new(dec!(1500), dec!(20), dec!(7500)).unwrap();
        assert_eq!(sharing.coinsurance_rate(), dec!(0.2));
    }

    #[test]
    fn test_cost_sharing_rejects_bad_percent() {
        let err = CostSharing::new(dec!(1500), dec!(120), dec!(7500)).unwrap_err();
        assert_eq!(
            err,
            LiabilityError::CoinsurancePercentOutOfRange { value: dec!(120) }
        );
    }

    #[test]
    fn test_apply_overrides_subset() {
        let sharing = CostSharing::new(dec!(1500), dec!(20), dec!(7500)).unwrap();
        let overrides = PlanOverrides {
            coinsurance_percent: Some(dec!(30)),
            ..PlanOverrides::default()
        };
        let applied = sharing.apply(&overrides);
        assert_eq!(applied.deductible, dec!(1500));
        assert_eq!(applied.coinsurance_percent, dec!(30));
        assert_eq!(applied.out_of_pocket_max, dec!(7500));
        assert!(PlanOverrides::default().is_empty());
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_liability_input_from_cost_sharing() {
        let sharing = CostSharing::new(dec!(2000), dec!(20), dec!(8000)).unwrap();
        let input = sharing.liability_input(dec!(32450)).unwrap();
        assert_eq!(input.remaining_deductible(), dec!(2000));
        assert_eq!(input.coinsurance_rate(), dec!(0.2));
        assert_eq!(input.out_of_pocket_max_remaining(), dec!(8000));
    }

    #[test]
    fn test_liability_input_rejects_overridden_percent() {
        let sharing = CostSharing::new(dec!(2000), dec!(20), dec!(8000)).unwrap();
        let overridden = sharing.apply(&PlanOverrides {
            coinsurance_percent: Some(dec!(150)),
            ..PlanOverrides::default()
        });
        assert!(matches!(
            overridden.liability_input(dec!(100)),
            Err(LiabilityError::CoinsurancePercentOutOfRange { .. })
        ));
    }
}
