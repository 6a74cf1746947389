//! Presentation helpers: cents rounding, currency text and the itemised
//! cost statement shown next to an estimate.
//!
//! Rounding happens here and only here; [`crate::compute`] works on exact
//! values.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{LiabilityInput, LiabilityResult};

const STATEMENT_WIDTH: usize = 46;

/// Share of the negotiated rate attributed to each billed component
const COMPONENT_SHARES: [(&str, u32); 4] = [
    ("Facility fee", 62),
    ("Surgeon fee", 18),
    ("Anesthesia", 7),
    ("Implant/hardware", 13),
];

/// Round to whole cents, midpoint away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// US currency text with thousands separators, e.g. `$32,450.00`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Who a statement line is charged to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    Charge,
    Patient,
    Plan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LineItem {
    pub label: String,
    pub amount: Decimal,
    pub kind: LineItemKind,
}

/// Estimated split of the negotiated rate into billed components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ComponentEstimate {
    pub label: String,
    pub share_percent: u32,
    pub amount: Decimal,
}

/// Itemised, cents-rounded view of one estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CostStatement {
    pub procedure_name: String,
    pub provider_name: String,
    pub line_items: Vec<LineItem>,
    pub estimated_components: Vec<ComponentEstimate>,
    pub total_due: Decimal,
    pub out_of_pocket_cap_applied: bool,
}

impl CostStatement {
    pub fn build(
        procedure_name: impl Into<String>,
        provider_name: impl Into<String>,
        input: &LiabilityInput,
        result: &LiabilityResult,
    ) -> Self {
        let coinsurance_percent = (input.coinsurance_rate() * Decimal::ONE_HUNDRED).normalize();

        let line_items = vec![
            LineItem {
                label: "Negotiated rate".to_string(),
                amount: round_cents(input.negotiated_rate()),
                kind: LineItemKind::Charge,
            },
            LineItem {
                label: "Deductible (you pay)".to_string(),
                amount: round_cents(result.breakdown.deductible_paid),
                kind: LineItemKind::Patient,
            },
            LineItem {
                label: format!("Co-insurance ({coinsurance_percent}%)"),
                amount: round_cents(result.breakdown.coinsurance_paid),
                kind: LineItemKind::Patient,
            },
            LineItem {
                label: "Plan pays".to_string(),
                amount: round_cents(result.breakdown.plan_pays),
                kind: LineItemKind::Plan,
            },
        ];

        Self {
            procedure_name: procedure_name.into(),
            provider_name: provider_name.into(),
            line_items,
            estimated_components: Self::estimated_components(input.negotiated_rate()),
            total_due: round_cents(result.total_liability),
            out_of_pocket_cap_applied: result.out_of_pocket_cap_applied,
        }
    }

    /// Split `negotiated_rate` into facility, surgeon, anesthesia and implant
    /// estimates. Leading components are truncated to cents and the last one
    /// takes the residual, so the parts sum to the cents-rounded rate.
    /// Shares are taken of `total / 100` so no product exceeds `total`.
    pub fn estimated_components(negotiated_rate: Decimal) -> Vec<ComponentEstimate> {
        let total = round_cents(negotiated_rate);
        let mut allocated = Decimal::ZERO;
        let last = COMPONENT_SHARES.len() - 1;

        COMPONENT_SHARES
            .iter()
            .enumerate()
            .map(|(i, (label, share))| {
                let amount = if i == last {
                    total - allocated
                } else {
                    (total / Decimal::ONE_HUNDRED * Decimal::from(*share))
                        .round_dp_with_strategy(2, RoundingStrategy::ToZero)
                };
                allocated += amount;
                ComponentEstimate {
                    label: (*label).to_string(),
                    share_percent: *share,
                    amount,
                }
            })
            .collect()
    }

    /// Fixed-width text rendering with dot leaders
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CostStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(STATEMENT_WIDTH);

        writeln!(f, "{}", self.provider_name)?;
        writeln!(f, "{}", self.procedure_name)?;
        writeln!(f, "{rule}")?;
        for component in &self.estimated_components {
            writeln!(
                f,
                "{}",
                leader_line(
                    &format!("  {} ({}%)", component.label, component.share_percent),
                    &format_usd(component.amount)
                )
            )?;
        }
        writeln!(f, "{rule}")?;
        for item in &self.line_items {
            writeln!(f, "{}", leader_line(&item.label, &format_usd(item.amount)))?;
        }
        writeln!(f, "{}", "=".repeat(STATEMENT_WIDTH))?;
        let total = format_usd(self.total_due);
        let label = "YOUR TOTAL DUE";
        let pad = STATEMENT_WIDTH.saturating_sub(label.len() + total.len()).max(1);
        writeln!(f, "{label}{}{total}", " ".repeat(pad))?;
        if self.out_of_pocket_cap_applied {
            writeln!(f, "(out-of-pocket maximum reached for this claim)")?;
        }
        Ok(())
    }
}

fn leader_line(label: &str, amount: &str) -> String {
    let dots = STATEMENT_WIDTH
        .saturating_sub(label.len() + amount.len() + 2)
        .max(2);
    format!("{label} {} {amount}", ".".repeat(dots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::compute;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_midpoint_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1.004)), dec!(1.00));
        assert_eq!(round_cents(dec!(15.0015)), dec!(15.00));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(0)), "$0.00");
        assert_eq!(format_usd(dec!(999)), "$999.00");
        assert_eq!(format_usd(dec!(1000)), "$1,000.00");
        assert_eq!(format_usd(dec!(32450)), "$32,450.00");
        assert_eq!(format_usd(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_usd(dec!(-6090.5)), "-$6,090.50");
    }

    #[test]
    fn test_format_usd_tiny_negative_rounds_to_zero() {
        assert_eq!(format_usd(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_statement_line_items() {
        let input = LiabilityInput::new(dec!(25000), dec!(5000), dec!(0.20), dec!(10000)).unwrap();
        let result = compute(&input);
        let statement = CostStatement::build("Total Hip Replacement", "Mayo Clinic", &input, &result);

        let labels: Vec<&str> = statement.line_items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Negotiated rate", "Deductible (you pay)", "Co-insurance (20%)", "Plan pays"]
        );
        assert_eq!(statement.line_items[1].amount, dec!(5000));
        assert_eq!(statement.line_items[2].amount, dec!(4000));
        assert_eq!(statement.line_items[3].kind, LineItemKind::Plan);
        assert_eq!(statement.total_due, dec!(9000));
        assert!(!statement.out_of_pocket_cap_applied);
    }

    #[test]
    fn test_fractional_coinsurance_label() {
        let input = LiabilityInput::new(dec!(100), dec!(0), dec!(0.125), dec!(1000)).unwrap();
        let statement = CostStatement::build("X-Ray", "Clinic", &input, &compute(&input));
        assert_eq!(statement.line_items[2].label, "Co-insurance (12.5%)");
    }

    #[test]
    fn test_components_sum_to_rate() {
        for rate in [dec!(25000), dec!(0.07), dec!(1234.57), dec!(0), dec!(99999.99)] {
            let components = CostStatement::estimated_components(rate);
            let sum: Decimal = components.iter().map(|c| c.amount).sum();
            assert_eq!(sum, round_cents(rate));
            assert!(components.iter().all(|c| c.amount >= Decimal::ZERO));
        }
    }

    #[test]
    fn test_components_shares() {
        let components = CostStatement::estimated_components(dec!(10000));
        let amounts: Vec<Decimal> = components.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![dec!(6200), dec!(1800), dec!(700), dec!(1300)]);
    }

    #[test]
    fn test_components_for_rates_near_decimal_max() {
        for rate in [Decimal::MAX, dec!(2000000000000000000000000000)] {
            let components = CostStatement::estimated_components(rate);
            let sum: Decimal = components.iter().map(|c| c.amount).sum();
            assert_eq!(sum, round_cents(rate));
            assert!(components.iter().all(|c| c.amount >= Decimal::ZERO));
        }
    }

    #[test]
    fn test_build_statement_for_huge_rate() {
        for rate in [Decimal::MAX, dec!(2000000000000000000000000000)] {
            let input = LiabilityInput::new(rate, dec!(2000), dec!(0.2), dec!(7500)).unwrap();
            let result = compute(&input);
            let statement = CostStatement::build("Proton Therapy", "Cancer Center", &input, &result);
            assert_eq!(statement.total_due, dec!(7500));
            assert!(statement.out_of_pocket_cap_applied);
            assert!(statement.render_text().contains("$7,500.00"));
        }
    }

    #[test]
    fn test_display_matches_render_text() {
        let input = LiabilityInput::new(dec!(1000), dec!(2000), dec!(0.3), dec!(5000)).unwrap();
        let statement = CostStatement::build("MRI Brain", "Clinic", &input, &compute(&input));
        assert_eq!(format!("{statement}"), statement.render_text());
        assert!(statement.to_string().starts_with("Clinic\nMRI Brain\n"));
    }

    #[test]
    fn test_render_text_mentions_cap() {
        let input = LiabilityInput::new(dec!(25000), dec!(5000), dec!(0.20), dec!(6000)).unwrap();
        let statement = CostStatement::build("Knee Arthroscopy", "General Hospital", &input, &compute(&input));
        let text = statement.render_text();
        assert!(text.contains("YOUR TOTAL DUE"));
        assert!(text.contains("$6,000.00"));
        assert!(text.contains("out-of-pocket maximum reached"));
        assert!(text.lines().any(|l| l.starts_with("Plan pays") && l.ends_with("$19,000.00")));
    }
}
