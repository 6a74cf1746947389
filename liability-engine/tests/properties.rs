use liability_engine::{compute, LiabilityInput};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn coinsurance() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis_points| Decimal::new(basis_points, 4))
}

fn input() -> impl Strategy<Value = LiabilityInput> {
    (money(), money(), coinsurance(), money()).prop_map(|(rate, deductible, coinsurance, oop)| {
        LiabilityInput::new(rate, deductible, coinsurance, oop).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_amounts_within_bounds(input in input()) {
        let result = compute(&input);
        let zero = Decimal::ZERO;

        prop_assert!(result.total_liability >= zero);
        prop_assert!(result.total_liability <= input.negotiated_rate());
        prop_assert!(result.total_liability <= input.out_of_pocket_max_remaining());
        prop_assert!(result.breakdown.deductible_paid >= zero);
        prop_assert!(result.breakdown.deductible_paid <= input.remaining_deductible());
        prop_assert!(result.breakdown.deductible_paid <= input.negotiated_rate());
        prop_assert!(result.breakdown.coinsurance_paid >= zero);
        prop_assert!(result.breakdown.plan_pays >= zero);
    }

    #[test]
    fn prop_breakdown_sums_exactly(input in input()) {
        let result = compute(&input);
        prop_assert_eq!(
            result.breakdown.deductible_paid + result.breakdown.coinsurance_paid,
            result.total_liability
        );
    }

    #[test]
    fn prop_plan_pays_is_the_rest(input in input()) {
        let result = compute(&input);
        prop_assert_eq!(
            result.breakdown.plan_pays + result.total_liability,
            input.negotiated_rate()
        );
    }

    #[test]
    fn prop_cap_flag_matches_total(input in input()) {
        let result = compute(&input);
        if result.out_of_pocket_cap_applied {
            prop_assert_eq!(result.total_liability, input.out_of_pocket_max_remaining());
        }
    }

    #[test]
    fn prop_larger_deductible_never_lowers_patient_share(
        rate in money(),
        low in money(),
        extra in money(),
        coinsurance in coinsurance(),
        oop in money(),
    ) {
        let high = low + extra;
        let smaller = compute(&LiabilityInput::new(rate, low, coinsurance, oop).unwrap());
        let larger = compute(&LiabilityInput::new(rate, high, coinsurance, oop).unwrap());

        prop_assert!(larger.breakdown.deductible_paid >= smaller.breakdown.deductible_paid);
        prop_assert!(larger.breakdown.coinsurance_paid <= smaller.breakdown.coinsurance_paid);
        prop_assert!(larger.total_liability >= smaller.total_liability);
    }

    #[test]
    fn prop_compute_is_idempotent(input in input()) {
        let first = compute(&input);
        let second = compute(&input);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_f64_boundary_matches_decimal(
        rate_cents in 0u32..=10_000_000,
        deductible_cents in 0u32..=1_000_000,
        percent in 0u32..=100,
        oop_cents in 0u32..=1_000_000,
    ) {
        let from_floats = LiabilityInput::from_f64(
            f64::from(rate_cents) / 100.0,
            f64::from(deductible_cents) / 100.0,
            f64::from(percent) / 100.0,
            f64::from(oop_cents) / 100.0,
        ).unwrap();
        let exact = LiabilityInput::new(
            Decimal::new(i64::from(rate_cents), 2),
            Decimal::new(i64::from(deductible_cents), 2),
            Decimal::new(i64::from(percent), 2),
            Decimal::new(i64::from(oop_cents), 2),
        ).unwrap();

        prop_assert_eq!(compute(&from_floats), compute(&exact));
    }
}
