//! Built-in reference scenarios
//!
//! Each scenario pins one documented calculator outcome. `carecost verify`
//! runs them against the compiled engine and the loaded catalog.

use liability_engine::{calculate_liability, LiabilityResult, PlanOverrides};
use price_catalog::Catalog;
use rust_decimal::Decimal;

/// Calculator inputs with the exact split they must produce
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub negotiated_rate: Decimal,
    pub remaining_deductible: Decimal,
    pub coinsurance_rate: Decimal,
    pub out_of_pocket_max_remaining: Decimal,
    pub expected_total: Decimal,
    pub expected_deductible_paid: Decimal,
    pub expected_coinsurance_paid: Decimal,
    pub expected_plan_pays: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl ScenarioOutcome {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

fn dollars(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn fraction(percent: i64) -> Decimal {
    Decimal::new(percent, 2)
}

pub fn reference_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "deductible plus coinsurance under the cap",
            negotiated_rate: dollars(25_000),
            remaining_deductible: dollars(5_000),
            coinsurance_rate: fraction(20),
            out_of_pocket_max_remaining: dollars(10_000),
            expected_total: dollars(9_000),
            expected_deductible_paid: dollars(5_000),
            expected_coinsurance_paid: dollars(4_000),
            expected_plan_pays: dollars(16_000),
        },
        Scenario {
            name: "out-of-pocket cap clamps coinsurance",
            negotiated_rate: dollars(25_000),
            remaining_deductible: dollars(5_000),
            coinsurance_rate: fraction(20),
            out_of_pocket_max_remaining: dollars(6_000),
            expected_total: dollars(6_000),
            expected_deductible_paid: dollars(5_000),
            expected_coinsurance_paid: dollars(1_000),
            expected_plan_pays: dollars(19_000),
        },
        Scenario {
            name: "deductible exceeds the bill",
            negotiated_rate: dollars(1_000),
            remaining_deductible: dollars(2_000),
            coinsurance_rate: fraction(30),
            out_of_pocket_max_remaining: dollars(5_000),
            expected_total: dollars(1_000),
            expected_deductible_paid: dollars(1_000),
            expected_coinsurance_paid: Decimal::ZERO,
            expected_plan_pays: Decimal::ZERO,
        },
        Scenario {
            name: "zero negotiated rate",
            negotiated_rate: Decimal::ZERO,
            remaining_deductible: dollars(1_000),
            coinsurance_rate: fraction(20),
            out_of_pocket_max_remaining: dollars(500),
            expected_total: Decimal::ZERO,
            expected_deductible_paid: Decimal::ZERO,
            expected_coinsurance_paid: Decimal::ZERO,
            expected_plan_pays: Decimal::ZERO,
        },
        Scenario {
            name: "effectively uncapped hip replacement",
            negotiated_rate: dollars(32_450),
            remaining_deductible: dollars(2_000),
            coinsurance_rate: fraction(20),
            out_of_pocket_max_remaining: dollars(999_999),
            expected_total: dollars(8_090),
            expected_deductible_paid: dollars(2_000),
            expected_coinsurance_paid: dollars(6_090),
            expected_plan_pays: dollars(24_360),
        },
    ]
}

fn check_split(name: &str, result: &LiabilityResult, scenario: &Scenario) -> ScenarioOutcome {
    let actual = [
        ("total_liability", result.total_liability, scenario.expected_total),
        (
            "deductible_paid",
            result.breakdown.deductible_paid,
            scenario.expected_deductible_paid,
        ),
        (
            "coinsurance_paid",
            result.breakdown.coinsurance_paid,
            scenario.expected_coinsurance_paid,
        ),
        ("plan_pays", result.breakdown.plan_pays, scenario.expected_plan_pays),
    ];

    let mismatches: Vec<String> = actual
        .iter()
        .filter(|(_, got, want)| got != want)
        .map(|(field, got, want)| format!("{field}: expected {want}, got {got}"))
        .collect();

    if mismatches.is_empty() {
        ScenarioOutcome::pass(name, format!("total {}", result.total_liability))
    } else {
        ScenarioOutcome::fail(name, mismatches.join("; "))
    }
}

pub fn run_scenario(scenario: &Scenario) -> ScenarioOutcome {
    match calculate_liability(
        scenario.negotiated_rate,
        scenario.remaining_deductible,
        scenario.coinsurance_rate,
        scenario.out_of_pocket_max_remaining,
    ) {
        Ok(result) => check_split(scenario.name, &result, scenario),
        Err(err) => ScenarioOutcome::fail(scenario.name, err.to_string()),
    }
}

/// Quote the hip replacement whose negotiated rate is pinned in the seed
/// data and check it reproduces the uncapped reference scenario.
pub fn catalog_smoke_check(catalog: &Catalog) -> ScenarioOutcome {
    const NAME: &str = "catalog quote: total-hip-replacement at mayo-clinic-rochester";

    let quote = match catalog.quote(
        "total-hip-replacement",
        "mayo-clinic-rochester",
        "uhc-choice-plus",
    ) {
        Ok(quote) => quote,
        Err(err) => return ScenarioOutcome::fail(NAME, err.to_string()),
    };

    let overrides = PlanOverrides {
        remaining_deductible: Some(dollars(2_000)),
        coinsurance_percent: Some(dollars(20)),
        out_of_pocket_max_remaining: Some(dollars(999_999)),
    };
    let estimate = match quote.estimate(&overrides) {
        Ok(estimate) => estimate,
        Err(err) => return ScenarioOutcome::fail(NAME, err.to_string()),
    };

    let expected = Scenario {
        name: NAME,
        negotiated_rate: dollars(32_450),
        remaining_deductible: dollars(2_000),
        coinsurance_rate: fraction(20),
        out_of_pocket_max_remaining: dollars(999_999),
        expected_total: dollars(8_090),
        expected_deductible_paid: dollars(2_000),
        expected_coinsurance_paid: dollars(6_090),
        expected_plan_pays: dollars(24_360),
    };

    if quote.rate.negotiated_rate != expected.negotiated_rate {
        return ScenarioOutcome::fail(
            NAME,
            format!(
                "negotiated rate: expected {}, got {}",
                expected.negotiated_rate, quote.rate.negotiated_rate
            ),
        );
    }
    check_split(NAME, &estimate.result, &expected)
}

/// Every reference scenario followed by the catalog smoke check
pub fn run_all(catalog: &Catalog) -> Vec<ScenarioOutcome> {
    let mut outcomes: Vec<ScenarioOutcome> =
        reference_scenarios().iter().map(run_scenario).collect();
    outcomes.push(catalog_smoke_check(catalog));
    outcomes
}
