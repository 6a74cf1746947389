//! Aggregates over one procedure's rates within a plan

use rust_decimal::Decimal;

use crate::catalog::{Catalog, RateLookup};
use crate::models::{PriceComparison, PriceRanking, PriceStats};

/// Round half toward positive infinity to whole units
fn round_half_up(value: Decimal) -> Decimal {
    (value + Decimal::new(5, 1)).floor()
}

impl Catalog {
    /// Min, max, upper median and whole-dollar mean of every provider's rate
    /// for a procedure under a plan; `None` when no rates exist.
    pub fn price_stats(&self, procedure_cpt: &str, plan_slug: &str) -> Option<PriceStats> {
        let prices: Vec<Decimal> = self
            .rates_for_procedure_by_plan(procedure_cpt, plan_slug)
            .iter()
            .map(|r| r.negotiated_rate)
            .collect();

        let min = *prices.first()?;
        let max = *prices.last()?;
        let median = *prices.get(prices.len() / 2)?;
        let sum: Decimal = prices.iter().sum();
        let mean = round_half_up(sum / Decimal::from(prices.len()));

        Some(PriceStats {
            min,
            max,
            median,
            mean,
            count: prices.len(),
        })
    }

    /// Rank of a provider among all providers for a procedure under a plan,
    /// cheapest first. Percentile is 100 for the cheapest.
    pub fn provider_ranking(
        &self,
        procedure_cpt: &str,
        provider_npi: &str,
        plan_slug: &str,
    ) -> Option<PriceRanking> {
        let rates = self.rates_for_procedure_by_plan(procedure_cpt, plan_slug);
        let index = rates.iter().position(|r| r.provider_npi == provider_npi)?;
        let total = rates.len();

        // round((1 - index / total) * 100) in integers
        let percentile = (200 * (total - index) + total) / (2 * total);

        Some(PriceRanking {
            rank: index + 1,
            total,
            percentile: u32::try_from(percentile).ok()?,
        })
    }

    /// A provider's rate against the plan-wide mean for the procedure.
    /// `None` when the rate is missing or the mean is zero.
    pub fn price_vs_average(
        &self,
        procedure_cpt: &str,
        provider_npi: &str,
        plan_slug: &str,
    ) -> Option<PriceComparison> {
        let rate = self
            .negotiated_rate(procedure_cpt, provider_npi, plan_slug)?
            .negotiated_rate;
        let stats = self.price_stats(procedure_cpt, plan_slug)?;
        if stats.mean.is_zero() {
            return None;
        }

        let difference = rate - stats.mean;
        let percent_diff = round_half_up(difference / stats.mean * Decimal::ONE_HUNDRED);

        Some(PriceComparison {
            rate,
            average: stats.mean,
            difference,
            percent_diff,
        })
    }
}
