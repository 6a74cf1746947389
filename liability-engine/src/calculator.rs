use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{LiabilityBreakdown, LiabilityInput, LiabilityResult};

/// Allocate one negotiated charge across deductible, coinsurance and the
/// insurer, with the remaining out-of-pocket maximum as a hard cap.
///
/// Stages run in order:
/// 1. the deductible absorbs up to the full charge;
/// 2. coinsurance applies to whatever is left;
/// 3. the patient total is clamped to the out-of-pocket maximum, with
///    coinsurance recomputed as the residual.
///
/// When the deductible portion alone exceeds the remaining out-of-pocket
/// maximum, the reported deductible is capped as well, so
/// `deductible_paid + coinsurance_paid == total_liability` always holds.
pub fn compute(input: &LiabilityInput) -> LiabilityResult {
    let negotiated_rate = input.negotiated_rate();
    let out_of_pocket_max = input.out_of_pocket_max_remaining();

    let deductible_paid = negotiated_rate.min(input.remaining_deductible());
    let remainder = (negotiated_rate - deductible_paid).max(Decimal::ZERO);

    let coinsurance_paid = remainder * input.coinsurance_rate();

    let provisional_total = deductible_paid + coinsurance_paid;
    let (deductible_paid, coinsurance_paid, out_of_pocket_cap_applied) =
        if provisional_total > out_of_pocket_max {
            let deductible_paid = deductible_paid.min(out_of_pocket_max);
            let coinsurance_paid = (out_of_pocket_max - deductible_paid).max(Decimal::ZERO);
            (deductible_paid, coinsurance_paid, true)
        } else {
            (deductible_paid, coinsurance_paid, false)
        };

    let total_liability = deductible_paid + coinsurance_paid;
    let plan_pays = negotiated_rate - total_liability;

    tracing::trace!(
        negotiated_rate = %negotiated_rate,
        total_liability = %total_liability,
        plan_pays = %plan_pays,
        out_of_pocket_cap_applied,
        "Computed patient liability"
    );

    LiabilityResult {
        total_liability,
        breakdown: LiabilityBreakdown {
            deductible_paid,
            coinsurance_paid,
            plan_pays,
        },
        out_of_pocket_cap_applied,
    }
}

/// Validate raw values, then [`compute`].
///
/// # Errors
///
/// Returns a [`crate::LiabilityError`] when any value is outside its domain.
pub fn calculate_liability(
    negotiated_rate: Decimal,
    remaining_deductible: Decimal,
    coinsurance_rate: Decimal,
    out_of_pocket_max_remaining: Decimal,
) -> EngineResult<LiabilityResult> {
    let input = LiabilityInput::new(
        negotiated_rate,
        remaining_deductible,
        coinsurance_rate,
        out_of_pocket_max_remaining,
    )?;
    Ok(compute(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LiabilityError, LiabilityField};
    use rust_decimal_macros::dec;

    fn input(rate: Decimal, deductible: Decimal, coinsurance: Decimal, oop: Decimal) -> LiabilityInput {
        LiabilityInput::new(rate, deductible, coinsurance, oop).unwrap()
    }

    #[test]
    fn test_deductible_then_coinsurance() {
        let result = compute(&input(dec!(25000), dec!(5000), dec!(0.20), dec!(10000)));
        assert_eq!(result.breakdown.deductible_paid, dec!(5000));
        assert_eq!(result.breakdown.coinsurance_paid, dec!(4000));
        assert_eq!(result.total_liability, dec!(9000));
        assert_eq!(result.breakdown.plan_pays, dec!(16000));
        assert!(!result.out_of_pocket_cap_applied);
    }

    #[test]
    fn test_cap_absorbed_by_coinsurance() {
        let result = compute(&input(dec!(25000), dec!(5000), dec!(0.20), dec!(6000)));
        assert_eq!(result.breakdown.deductible_paid, dec!(5000));
        assert_eq!(result.breakdown.coinsurance_paid, dec!(1000));
        assert_eq!(result.total_liability, dec!(6000));
        assert_eq!(result.breakdown.plan_pays, dec!(19000));
        assert!(result.out_of_pocket_cap_applied);
    }

    #[test]
    fn test_cap_below_deductible_caps_reported_deductible() {
        let result = compute(&input(dec!(10000), dec!(5000), dec!(0.20), dec!(3000)));
        assert_eq!(result.total_liability, dec!(3000));
        assert_eq!(result.breakdown.deductible_paid, dec!(3000));
        assert_eq!(result.breakdown.coinsurance_paid, dec!(0));
        assert_eq!(result.breakdown.plan_pays, dec!(7000));
        assert!(result.out_of_pocket_cap_applied);
    }

    #[test]
    fn test_total_exactly_at_cap_is_not_flagged() {
        // 1000 + 0.5 * 1000 = 1500, equal to the cap
        let result = compute(&input(dec!(2000), dec!(1000), dec!(0.5), dec!(1500)));
        assert_eq!(result.total_liability, dec!(1500));
        assert!(!result.out_of_pocket_cap_applied);
    }

    #[test]
    fn test_fractional_cents_are_not_rounded() {
        let result = compute(&input(dec!(100.01), dec!(0), dec!(0.15), dec!(1000)));
        assert_eq!(result.breakdown.coinsurance_paid, dec!(15.0015));
        assert_eq!(result.breakdown.plan_pays, dec!(85.0085));
    }

    #[test]
    fn test_calculate_liability_validates() {
        let err = calculate_liability(dec!(100), dec!(0), dec!(0.2), dec!(-1)).unwrap_err();
        assert_eq!(
            err,
            LiabilityError::Negative {
                field: LiabilityField::OutOfPocketMaxRemaining,
                value: dec!(-1)
            }
        );

        let ok = calculate_liability(dec!(100), dec!(0), dec!(0.2), dec!(1000)).unwrap();
        assert_eq!(ok.total_liability, dec!(20));
    }
}
