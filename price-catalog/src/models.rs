use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use liability_engine::CostSharing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CatalogError;

/// Procedure category, which sets the base price used for rate generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProcedureCategory {
    Inpatient,
    Outpatient,
    Imaging,
    Laboratory,
    Emergency,
}

impl ProcedureCategory {
    /// National average base price in whole dollars
    pub fn base_price(self) -> Decimal {
        match self {
            ProcedureCategory::Inpatient => Decimal::from(45_000),
            ProcedureCategory::Outpatient => Decimal::from(3_500),
            ProcedureCategory::Imaging => Decimal::from(1_200),
            ProcedureCategory::Laboratory => Decimal::from(500),
            ProcedureCategory::Emergency => Decimal::from(8_000),
        }
    }

    pub fn place_of_service(self) -> PlaceOfService {
        match self {
            ProcedureCategory::Inpatient => PlaceOfService::Inpatient,
            _ => PlaceOfService::Outpatient,
        }
    }
}

/// Billable procedure identified by CPT code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Procedure {
    pub cpt_code: String,
    pub slug: String,
    pub name: String,
    pub category: ProcedureCategory,
    #[serde(default)]
    pub description: String,
}

/// Facility identified by NPI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Provider {
    pub npi: String,
    pub slug: String,
    pub name: String,
    pub facility_type: String,
    pub city: String,
    pub state: String,
    /// Major academic centers negotiate higher rates
    #[serde(default)]
    pub premium_tier: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkType {
    Ppo,
    Hmo,
    Epo,
    Pos,
    Hdhp,
}

impl NetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Ppo => "PPO",
            NetworkType::Hmo => "HMO",
            NetworkType::Epo => "EPO",
            NetworkType::Pos => "POS",
            NetworkType::Hdhp => "HDHP",
        }
    }

    /// Multiplier applied to the base price; HMOs negotiate hardest
    pub fn network_discount(self) -> Decimal {
        match self {
            NetworkType::Hmo => Decimal::new(85, 2),
            NetworkType::Epo => Decimal::new(90, 2),
            NetworkType::Ppo | NetworkType::Pos | NetworkType::Hdhp => Decimal::new(95, 2),
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PPO" => Ok(NetworkType::Ppo),
            "HMO" => Ok(NetworkType::Hmo),
            "EPO" => Ok(NetworkType::Epo),
            "POS" => Ok(NetworkType::Pos),
            "HDHP" => Ok(NetworkType::Hdhp),
            other => Err(CatalogError::Invalid(format!(
                "unknown network type '{other}', expected one of PPO, HMO, EPO, POS, HDHP"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MetalTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Catastrophic,
}

/// Insurance product with its typical cost-sharing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PayerPlan {
    pub slug: String,
    pub payer_name: String,
    pub plan_name: String,
    pub network_type: NetworkType,
    #[serde(default)]
    pub metal_tier: Option<MetalTier>,
    pub plan_year: u16,
    pub cost_sharing: CostSharing,
}

impl PayerPlan {
    /// "UnitedHealthcare Choice Plus"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.payer_name, self.plan_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Negotiated,
    Derived,
    FeeSchedule,
    PerDiem,
    PercentOfBilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaceOfService {
    Inpatient,
    Outpatient,
}

/// Where a rate came from in the payer's machine-readable file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RateProvenance {
    pub extracted_at: DateTime<Utc>,
    pub mrf_version: String,
    pub reporting_period: String,
}

/// Contracted price for one procedure at one provider under one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NegotiatedRate {
    pub procedure_cpt: String,
    pub provider_npi: String,
    pub plan_slug: String,
    pub negotiated_rate: Decimal,
    pub contract_type: ContractType,
    pub place_of_service: PlaceOfService,
    pub source: RateProvenance,
}

/// Distribution of one procedure's rates within a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceStats {
    pub min: Decimal,
    pub max: Decimal,
    pub median: Decimal,
    pub mean: Decimal,
    pub count: usize,
}

/// Position of one provider among all providers for a procedure and plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceRanking {
    /// 1-based, cheapest first
    pub rank: usize,
    pub total: usize,
    pub percentile: u32,
}

/// One provider's rate against the plan-wide mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriceComparison {
    pub rate: Decimal,
    pub average: Decimal,
    pub difference: Decimal,
    pub percent_diff: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_prices() {
        assert_eq!(ProcedureCategory::Inpatient.base_price(), dec!(45000));
        assert_eq!(ProcedureCategory::Outpatient.base_price(), dec!(3500));
        assert_eq!(ProcedureCategory::Imaging.base_price(), dec!(1200));
        assert_eq!(ProcedureCategory::Laboratory.base_price(), dec!(500));
        assert_eq!(ProcedureCategory::Emergency.base_price(), dec!(8000));
    }

    #[test]
    fn test_network_discounts() {
        assert_eq!(NetworkType::Hmo.network_discount(), dec!(0.85));
        assert_eq!(NetworkType::Epo.network_discount(), dec!(0.90));
        assert_eq!(NetworkType::Ppo.network_discount(), dec!(0.95));
        assert_eq!(NetworkType::Hdhp.network_discount(), dec!(0.95));
    }

    #[test]
    fn test_network_type_parse_is_case_insensitive() {
        assert_eq!("hmo".parse::<NetworkType>().unwrap(), NetworkType::Hmo);
        assert_eq!(" PPO ".parse::<NetworkType>().unwrap(), NetworkType::Ppo);
        assert!("HSA".parse::<NetworkType>().is_err());
    }

    #[test]
    fn test_network_type_serde_uses_uppercase() {
        let yaml = serde_yaml::to_string(&NetworkType::Hdhp).unwrap();
        assert_eq!(yaml.trim(), "HDHP");
        let parsed: NetworkType = serde_yaml::from_str("EPO").unwrap();
        assert_eq!(parsed, NetworkType::Epo);
    }

    #[test]
    fn test_place_of_service_follows_category() {
        assert_eq!(ProcedureCategory::Inpatient.place_of_service(), PlaceOfService::Inpatient);
        assert_eq!(ProcedureCategory::Imaging.place_of_service(), PlaceOfService::Outpatient);
    }
}
