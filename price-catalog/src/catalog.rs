use std::collections::{HashMap, HashSet};
use std::path::Path;

use liability_engine::{CostStatement, LiabilityInput, LiabilityResult, PlanOverrides};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    ContractType, NegotiatedRate, NetworkType, PayerPlan, Procedure, Provider, RateProvenance,
};
use crate::pricing;

const SEED_CATALOG: &str = include_str!("../data/catalog.yaml");

/// On-disk catalog document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub provenance: RateProvenance,
    pub procedures: Vec<Procedure>,
    pub providers: Vec<Provider>,
    pub plans: Vec<PayerPlan>,
    #[serde(default)]
    pub rate_overrides: Vec<RateOverride>,
}

/// Explicit rate replacing the generated one for a combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOverride {
    pub procedure_cpt: String,
    pub provider_npi: String,
    pub plan_slug: String,
    pub negotiated_rate: Decimal,
    #[serde(default = "default_contract_type")]
    pub contract_type: ContractType,
}

fn default_contract_type() -> ContractType {
    ContractType::Negotiated
}

/// Source of negotiated rates
pub trait RateLookup {
    fn negotiated_rate(
        &self,
        procedure_cpt: &str,
        provider_npi: &str,
        plan_slug: &str,
    ) -> Option<&NegotiatedRate>;
}

/// Source of plan cost-sharing parameters
pub trait PlanDirectory {
    fn plan(&self, slug: &str) -> Option<&PayerPlan>;
    fn plans(&self) -> &[PayerPlan];
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RateKey {
    procedure_cpt: String,
    provider_npi: String,
    plan_slug: String,
}

impl RateKey {
    fn new(procedure_cpt: &str, provider_npi: &str, plan_slug: &str) -> Self {
        Self {
            procedure_cpt: procedure_cpt.to_string(),
            provider_npi: provider_npi.to_string(),
            plan_slug: plan_slug.to_string(),
        }
    }
}

/// Immutable, validated set of procedures, providers, plans and rates.
///
/// Built once at startup and shared read-only; every lookup borrows.
#[derive(Debug, Clone)]
pub struct Catalog {
    provenance: RateProvenance,
    procedures: Vec<Procedure>,
    providers: Vec<Provider>,
    plans: Vec<PayerPlan>,
    rates: HashMap<RateKey, NegotiatedRate>,
    override_count: usize,
}

/// A resolved procedure, provider, plan and rate
#[derive(Debug, Clone, Copy)]
pub struct Quote<'a> {
    pub procedure: &'a Procedure,
    pub provider: &'a Provider,
    pub plan: &'a PayerPlan,
    pub rate: &'a NegotiatedRate,
}

/// Liability estimate for a quote under (possibly overridden) plan parameters
#[derive(Debug, Clone)]
pub struct QuoteEstimate {
    pub input: LiabilityInput,
    pub result: LiabilityResult,
    pub statement: CostStatement,
}

impl Quote<'_> {
    /// Calculator input from the plan's cost sharing with `overrides` applied.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CostSharing`] when an override is out of range.
    pub fn liability_input(&self, overrides: &PlanOverrides) -> CatalogResult<LiabilityInput> {
        Ok(self
            .plan
            .cost_sharing
            .apply(overrides)
            .liability_input(self.rate.negotiated_rate)?)
    }

    /// Run the calculator for this quote and build its statement.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CostSharing`] when an override is out of range.
    pub fn estimate(&self, overrides: &PlanOverrides) -> CatalogResult<QuoteEstimate> {
        let input = self.liability_input(overrides)?;
        let result = liability_engine::compute(&input);
        let statement = CostStatement::build(
            self.procedure.name.as_str(),
            self.provider.name.as_str(),
            &input,
            &result,
        );
        Ok(QuoteEstimate {
            input,
            result,
            statement,
        })
    }
}

impl Catalog {
    /// The catalog compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document fails validation.
    pub fn seed() -> CatalogResult<Self> {
        Self::from_yaml_str(SEED_CATALOG)
    }

    /// Load a catalog document from `path`
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Catalog::from_yaml_str`].
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading catalog file");
        Self::from_yaml_str(&text)
    }

    /// Seed catalog, or the file at `path` when one is given
    ///
    /// # Errors
    ///
    /// Propagates load and validation errors.
    pub fn load_or_seed(path: Option<&Path>) -> CatalogResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::seed(),
        }
    }

    /// Parse and validate a YAML catalog document
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed YAML and
    /// [`CatalogError::Invalid`] or [`CatalogError::CostSharing`] for
    /// inconsistent data.
    pub fn from_yaml_str(text: &str) -> CatalogResult<Self> {
        let data: CatalogData = serde_yaml::from_str(text)?;
        Self::from_data(data)
    }

    /// Validate `data` and generate the full rate table
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] for duplicate identifiers, negative
    /// or dangling overrides, and [`CatalogError::CostSharing`] for plan
    /// parameters out of range.
    pub fn from_data(data: CatalogData) -> CatalogResult<Self> {
        ensure_unique("procedure slug", data.procedures.iter().map(|p| p.slug.as_str()))?;
        ensure_unique("CPT code", data.procedures.iter().map(|p| p.cpt_code.as_str()))?;
        ensure_unique("provider slug", data.providers.iter().map(|p| p.slug.as_str()))?;
        ensure_unique("NPI", data.providers.iter().map(|p| p.npi.as_str()))?;
        ensure_unique("plan slug", data.plans.iter().map(|p| p.slug.as_str()))?;

        for plan in &data.plans {
            plan.cost_sharing.validate().map_err(|err| {
                tracing::warn!(plan = %plan.slug, error = %err, "Rejected plan cost sharing");
                CatalogError::CostSharing(err)
            })?;
        }

        let mut rates = HashMap::with_capacity(
            data.procedures.len() * data.providers.len() * data.plans.len(),
        );
        for procedure in &data.procedures {
            for provider in &data.providers {
                for plan in &data.plans {
                    let rate = pricing::generate_rate(procedure, provider, plan, &data.provenance);
                    rates.insert(RateKey::new(&procedure.cpt_code, &provider.npi, &plan.slug), rate);
                }
            }
        }

        for entry in &data.rate_overrides {
            if entry.negotiated_rate < Decimal::ZERO {
                return Err(CatalogError::Invalid(format!(
                    "override for CPT {} at NPI {} under {} has negative rate {}",
                    entry.procedure_cpt, entry.provider_npi, entry.plan_slug, entry.negotiated_rate
                )));
            }
            let key = RateKey::new(&entry.procedure_cpt, &entry.provider_npi, &entry.plan_slug);
            let rate = rates.get_mut(&key).ok_or_else(|| {
                CatalogError::Invalid(format!(
                    "override refers to unknown combination CPT {} / NPI {} / plan {}",
                    entry.procedure_cpt, entry.provider_npi, entry.plan_slug
                ))
            })?;
            rate.negotiated_rate = entry.negotiated_rate;
            rate.contract_type = entry.contract_type;
        }

        tracing::info!(
            procedures = data.procedures.len(),
            providers = data.providers.len(),
            plans = data.plans.len(),
            rates = rates.len(),
            overrides = data.rate_overrides.len(),
            "Catalog loaded"
        );

        Ok(Self {
            provenance: data.provenance,
            procedures: data.procedures,
            providers: data.providers,
            plans: data.plans,
            rates,
            override_count: data.rate_overrides.len(),
        })
    }

    pub fn provenance(&self) -> &RateProvenance {
        &self.provenance
    }

    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn plans(&self) -> &[PayerPlan] {
        &self.plans
    }

    pub fn rate_count(&self) -> usize {
        self.rates.len()
    }

    pub fn override_count(&self) -> usize {
        self.override_count
    }

    pub fn procedure_by_slug(&self, slug: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.slug == slug)
    }

    pub fn procedure_by_cpt(&self, cpt_code: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.cpt_code == cpt_code)
    }

    pub fn provider_by_slug(&self, slug: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.slug == slug)
    }

    pub fn provider_by_npi(&self, npi: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.npi == npi)
    }

    pub fn plan_by_slug(&self, slug: &str) -> Option<&PayerPlan> {
        self.plans.iter().find(|p| p.slug == slug)
    }

    /// Plans whose payer name contains `payer_name`, ignoring case
    pub fn plans_by_payer(&self, payer_name: &str) -> Vec<&PayerPlan> {
        let needle = payer_name.to_lowercase();
        self.plans
            .iter()
            .filter(|p| p.payer_name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn plans_by_network_type(&self, network_type: NetworkType) -> Vec<&PayerPlan> {
        self.plans
            .iter()
            .filter(|p| p.network_type == network_type)
            .collect()
    }

    /// Resolve three slugs and the rate joining them.
    ///
    /// # Errors
    ///
    /// Returns the not-found error for the first slug that does not resolve,
    /// or [`CatalogError::RateNotFound`] when the combination has no rate.
    pub fn quote(
        &self,
        procedure_slug: &str,
        provider_slug: &str,
        plan_slug: &str,
    ) -> CatalogResult<Quote<'_>> {
        let procedure = self
            .procedure_by_slug(procedure_slug)
            .ok_or_else(|| CatalogError::UnknownProcedure(procedure_slug.to_string()))?;
        let provider = self
            .provider_by_slug(provider_slug)
            .ok_or_else(|| CatalogError::UnknownProvider(provider_slug.to_string()))?;
        let plan = self
            .plan_by_slug(plan_slug)
            .ok_or_else(|| CatalogError::UnknownPlan(plan_slug.to_string()))?;
        let rate = self
            .negotiated_rate(&procedure.cpt_code, &provider.npi, &plan.slug)
            .ok_or_else(|| CatalogError::RateNotFound {
                procedure_cpt: procedure.cpt_code.clone(),
                provider_npi: provider.npi.clone(),
                plan_slug: plan.slug.clone(),
            })?;

        Ok(Quote {
            procedure,
            provider,
            plan,
            rate,
        })
    }

    /// Every plan's rate for a procedure at one provider, cheapest first
    pub fn rates_for_procedure_at_provider(
        &self,
        procedure_cpt: &str,
        provider_npi: &str,
    ) -> Vec<&NegotiatedRate> {
        let mut rates: Vec<&NegotiatedRate> = self
            .plans
            .iter()
            .filter_map(|plan| self.negotiated_rate(procedure_cpt, provider_npi, &plan.slug))
            .collect();
        rates.sort_by_key(|r| r.negotiated_rate);
        rates
    }

    /// Every provider's rate for a procedure under one plan, cheapest first
    pub fn rates_for_procedure_by_plan(
        &self,
        procedure_cpt: &str,
        plan_slug: &str,
    ) -> Vec<&NegotiatedRate> {
        let mut rates: Vec<&NegotiatedRate> = self
            .providers
            .iter()
            .filter_map(|provider| self.negotiated_rate(procedure_cpt, &provider.npi, plan_slug))
            .collect();
        rates.sort_by_key(|r| r.negotiated_rate);
        rates
    }
}

impl RateLookup for Catalog {
    fn negotiated_rate(
        &self,
        procedure_cpt: &str,
        provider_npi: &str,
        plan_slug: &str,
    ) -> Option<&NegotiatedRate> {
        self.rates
            .get(&RateKey::new(procedure_cpt, provider_npi, plan_slug))
    }
}

impl PlanDirectory for Catalog {
    fn plan(&self, slug: &str) -> Option<&PayerPlan> {
        self.plan_by_slug(slug)
    }

    fn plans(&self) -> &[PayerPlan] {
        &self.plans
    }
}

fn ensure_unique<'a>(what: &str, values: impl Iterator<Item = &'a str>) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(CatalogError::Invalid(format!("duplicate {what} '{value}'")));
        }
    }
    Ok(())
}
