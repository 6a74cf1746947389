//! Rate generation for combinations the source data does not list.
//!
//! `rate = base_price × provider_multiplier × network_discount × regional_variance`,
//! rounded to whole dollars. The variance is a pure function of the
//! procedure, provider and plan identifiers, so a catalog always produces the
//! same rates.

use rust_decimal::{Decimal, RoundingStrategy};
use sha2::{Digest, Sha256};

use crate::models::{ContractType, NegotiatedRate, PayerPlan, Procedure, Provider, RateProvenance};

/// Lower bound of the regional variance band
const VARIANCE_FLOOR: Decimal = Decimal::from_parts(75, 0, 0, false, 2);
/// Width of the band; variance falls in `[0.75, 1.25)`
const VARIANCE_SPAN: Decimal = Decimal::from_parts(50, 0, 0, false, 2);
const PREMIUM_MULTIPLIER: Decimal = Decimal::from_parts(135, 0, 0, false, 2);

/// Deterministic regional variance in `[0.75, 1.25)` for a combination
pub fn regional_variance(procedure_cpt: &str, provider_npi: &str, plan_slug: &str) -> Decimal {
    let digest = Sha256::new()
        .chain_update(procedure_cpt.as_bytes())
        .chain_update(b"|")
        .chain_update(provider_npi.as_bytes())
        .chain_update(b"|")
        .chain_update(plan_slug.as_bytes())
        .finalize();

    let sample = digest
        .iter()
        .take(8)
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));

    // sample / 2^64 is in [0, 1)
    let unit = Decimal::from(sample) / (Decimal::from(u64::MAX) + Decimal::ONE);
    VARIANCE_FLOOR + VARIANCE_SPAN * unit
}

pub fn provider_multiplier(provider: &Provider) -> Decimal {
    if provider.premium_tier {
        PREMIUM_MULTIPLIER
    } else {
        Decimal::ONE
    }
}

/// Whole-dollar generated rate for a procedure at a provider under a plan
pub fn generated_amount(procedure: &Procedure, provider: &Provider, plan: &PayerPlan) -> Decimal {
    let variance = regional_variance(&procedure.cpt_code, &provider.npi, &plan.slug);
    (procedure.category.base_price()
        * provider_multiplier(provider)
        * plan.network_type.network_discount()
        * variance)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn generate_rate(
    procedure: &Procedure,
    provider: &Provider,
    plan: &PayerPlan,
    source: &RateProvenance,
) -> NegotiatedRate {
    NegotiatedRate {
        procedure_cpt: procedure.cpt_code.clone(),
        provider_npi: provider.npi.clone(),
        plan_slug: plan.slug.clone(),
        negotiated_rate: generated_amount(procedure, provider, plan),
        contract_type: ContractType::Negotiated,
        place_of_service: procedure.category.place_of_service(),
        source: source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NetworkType, ProcedureCategory};
    use liability_engine::CostSharing;
    use rust_decimal_macros::dec;

    fn procedure(category: ProcedureCategory) -> Procedure {
        Procedure {
            cpt_code: "27130".to_string(),
            slug: "total-hip-replacement".to_string(),
            name: "Total Hip Replacement".to_string(),
            category,
            description: String::new(),
        }
    }

    fn provider(premium_tier: bool) -> Provider {
        Provider {
            npi: "1316921218".to_string(),
            slug: "mayo-clinic-rochester".to_string(),
            name: "Mayo Clinic - Rochester".to_string(),
            facility_type: "Hospital".to_string(),
            city: "Rochester".to_string(),
            state: "MN".to_string(),
            premium_tier,
        }
    }

    fn plan(network_type: NetworkType) -> PayerPlan {
        PayerPlan {
            slug: "uhc-choice-plus".to_string(),
            payer_name: "UnitedHealthcare".to_string(),
            plan_name: "Choice Plus".to_string(),
            network_type,
            metal_tier: None,
            plan_year: 2025,
            cost_sharing: CostSharing::new(dec!(1500), dec!(20), dec!(7500)).unwrap(),
        }
    }

    #[test]
    fn test_variance_is_deterministic_and_in_band() {
        let first = regional_variance("27130", "1316921218", "uhc-choice-plus");
        let second = regional_variance("27130", "1316921218", "uhc-choice-plus");
        assert_eq!(first, second);

        for (cpt, npi, plan) in [
            ("27130", "1316921218", "uhc-choice-plus"),
            ("45378", "1003857137", "kaiser-hmo-gold"),
            ("77067", "1548258979", "anthem-pathway-enhanced"),
            ("", "", ""),
        ] {
            let variance = regional_variance(cpt, npi, plan);
            assert!(variance >= dec!(0.75), "{variance} below band");
            assert!(variance < dec!(1.25), "{variance} above band");
        }
    }

    #[test]
    fn test_variance_depends_on_every_key_part() {
        let base = regional_variance("27130", "1316921218", "uhc-choice-plus");
        assert_ne!(base, regional_variance("27447", "1316921218", "uhc-choice-plus"));
        assert_ne!(base, regional_variance("27130", "1649227067", "uhc-choice-plus"));
        assert_ne!(base, regional_variance("27130", "1316921218", "kaiser-hmo-gold"));
    }

    #[test]
    fn test_generated_amount_is_whole_dollars_in_expected_range() {
        let amount = generated_amount(
            &procedure(ProcedureCategory::Inpatient),
            &provider(true),
            &plan(NetworkType::Hmo),
        );
        assert_eq!(amount, amount.trunc());
        // 45000 * 1.35 * 0.85 = 51637.5, times [0.75, 1.25)
        assert!(amount >= dec!(38728));
        assert!(amount <= dec!(64547));
    }

    #[test]
    fn test_premium_tier_raises_rate() {
        let standard = generated_amount(
            &procedure(ProcedureCategory::Imaging),
            &provider(false),
            &plan(NetworkType::Ppo),
        );
        let premium = generated_amount(
            &procedure(ProcedureCategory::Imaging),
            &provider(true),
            &plan(NetworkType::Ppo),
        );
        assert!(premium > standard);
    }

    #[test]
    fn test_generate_rate_fills_contract_fields() {
        let source = RateProvenance {
            extracted_at: "2025-12-15T00:00:00Z".parse().unwrap(),
            mrf_version: "1.0.0".to_string(),
            reporting_period: "2025-Q4".to_string(),
        };
        let rate = generate_rate(
            &procedure(ProcedureCategory::Inpatient),
            &provider(false),
            &plan(NetworkType::Epo),
            &source,
        );
        assert_eq!(rate.contract_type, ContractType::Negotiated);
        assert_eq!(rate.place_of_service, crate::models::PlaceOfService::Inpatient);
        assert_eq!(rate.source, source);
        assert_eq!(rate.plan_slug, "uhc-choice-plus");
    }
}
