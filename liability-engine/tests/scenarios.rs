use liability_engine::{calculate_liability, compute, LiabilityError, LiabilityInput, LiabilityResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn run(rate: Decimal, deductible: Decimal, coinsurance: Decimal, oop: Decimal) -> LiabilityResult {
    calculate_liability(rate, deductible, coinsurance, oop).expect("valid scenario input")
}

fn assert_split(result: &LiabilityResult, deductible: Decimal, coinsurance: Decimal, total: Decimal, plan: Decimal) {
    assert_eq!(result.breakdown.deductible_paid, deductible, "deductible_paid");
    assert_eq!(result.breakdown.coinsurance_paid, coinsurance, "coinsurance_paid");
    assert_eq!(result.total_liability, total, "total_liability");
    assert_eq!(result.breakdown.plan_pays, plan, "plan_pays");
}

#[test]
fn test_scenario_deductible_plus_coinsurance_under_cap() {
    let result = run(dec!(25000), dec!(5000), dec!(0.20), dec!(10000));
    assert_split(&result, dec!(5000), dec!(4000), dec!(9000), dec!(16000));
}

#[test]
fn test_scenario_out_of_pocket_cap_clamps_coinsurance() {
    let result = run(dec!(25000), dec!(5000), dec!(0.20), dec!(6000));
    assert_split(&result, dec!(5000), dec!(1000), dec!(6000), dec!(19000));
    assert!(result.out_of_pocket_cap_applied);
}

#[test]
fn test_scenario_deductible_exceeds_bill() {
    let result = run(dec!(1000), dec!(2000), dec!(0.30), dec!(5000));
    assert_split(&result, dec!(1000), dec!(0), dec!(1000), dec!(0));
}

#[test]
fn test_scenario_zero_rate_is_all_zeros() {
    let result = run(dec!(0), dec!(1000), dec!(0.2), dec!(500));
    assert_split(&result, dec!(0), dec!(0), dec!(0), dec!(0));
    assert!(!result.out_of_pocket_cap_applied);
}

#[test]
fn test_scenario_effectively_uncapped() {
    let result = run(dec!(32450), dec!(2000), dec!(0.20), dec!(999999));
    assert_split(&result, dec!(2000), dec!(6090), dec!(8090), dec!(24360));
}

#[test]
fn test_zero_out_of_pocket_remaining_owes_nothing() {
    let result = run(dec!(8000), dec!(1500), dec!(0.25), dec!(0));
    assert_split(&result, dec!(0), dec!(0), dec!(0), dec!(8000));
    assert!(result.out_of_pocket_cap_applied);
}

#[test]
fn test_zero_deductible_puts_whole_bill_under_coinsurance() {
    let result = run(dec!(3500), dec!(0), dec!(0.20), dec!(7500));
    assert_split(&result, dec!(0), dec!(700), dec!(700), dec!(2800));
}

#[test]
fn test_zero_coinsurance_pays_only_deductible() {
    let result = run(dec!(3500), dec!(1000), dec!(0), dec!(7500));
    assert_split(&result, dec!(1000), dec!(0), dec!(1000), dec!(2500));
}

#[test]
fn test_zero_coinsurance_deductible_still_capped() {
    let result = run(dec!(3500), dec!(1000), dec!(0), dec!(400));
    assert_split(&result, dec!(400), dec!(0), dec!(400), dec!(3100));
}

#[test]
fn test_full_coinsurance_pays_whole_bill_up_to_cap() {
    let result = run(dec!(3500), dec!(1000), dec!(1), dec!(7500));
    assert_split(&result, dec!(1000), dec!(2500), dec!(3500), dec!(0));

    let capped = run(dec!(3500), dec!(1000), dec!(1), dec!(2000));
    assert_split(&capped, dec!(1000), dec!(1000), dec!(2000), dec!(1500));
}

#[test]
fn test_deductible_equal_to_rate() {
    let result = run(dec!(1200), dec!(1200), dec!(0.3), dec!(5000));
    assert_split(&result, dec!(1200), dec!(0), dec!(1200), dec!(0));
}

#[test]
fn test_cap_below_deductible_keeps_breakdown_consistent() {
    let result = run(dec!(45000), dec!(3000), dec!(0.3), dec!(1200));
    assert_split(&result, dec!(1200), dec!(0), dec!(1200), dec!(43800));
}

#[test]
fn test_invalid_inputs_are_rejected_not_clamped() {
    assert!(matches!(
        calculate_liability(dec!(-100), dec!(0), dec!(0.2), dec!(100)),
        Err(LiabilityError::Negative { .. })
    ));
    assert!(matches!(
        calculate_liability(dec!(100), dec!(0), dec!(1.2), dec!(100)),
        Err(LiabilityError::CoinsuranceOutOfRange { .. })
    ));
    assert!(matches!(
        LiabilityInput::from_f64(100.0, f64::NAN, 0.2, 100.0),
        Err(LiabilityError::NonFinite { .. })
    ));
}

#[test]
fn test_compute_is_deterministic() {
    let input = LiabilityInput::new(dec!(12345.67), dec!(890.12), dec!(0.35), dec!(4321)).unwrap();
    assert_eq!(compute(&input), compute(&input));
}

#[test]
fn test_result_serializes_money_as_strings() {
    let result = run(dec!(25000), dec!(5000), dec!(0.20), dec!(10000));
    let json = serde_json::to_value(result).unwrap();
    let total: Decimal = json["total_liability"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(9000));
    assert_eq!(json["out_of_pocket_cap_applied"], false);
    assert!(json["breakdown"]["plan_pays"].is_string());
}
