use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use liability_engine::{CostStatement, LiabilityResult, PlanOverrides};
use price_catalog::{
    NegotiatedRate, PayerPlan, PriceComparison, PriceRanking, PriceStats, Procedure, Provider,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareCostServer;

/// Optional adjustments to the plan's typical cost sharing
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CostQuery {
    /// Deductible still to be met, in dollars
    #[param(example = "1500")]
    pub remaining_deductible: Option<Decimal>,
    /// Coinsurance as a whole percentage, e.g. `20`
    #[param(example = "20")]
    pub coinsurance_percent: Option<Decimal>,
    /// Out-of-pocket maximum still remaining, in dollars
    #[param(example = "6000")]
    pub out_of_pocket_max_remaining: Option<Decimal>,
}

impl From<CostQuery> for PlanOverrides {
    fn from(query: CostQuery) -> Self {
        PlanOverrides {
            remaining_deductible: query.remaining_deductible,
            coinsurance_percent: query.coinsurance_percent,
            out_of_pocket_max_remaining: query.out_of_pocket_max_remaining,
        }
    }
}

/// Plan parameters the estimate was computed with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct EstimateInputs {
    pub remaining_deductible: Decimal,
    pub coinsurance_percent: Decimal,
    pub coinsurance_rate: Decimal,
    pub out_of_pocket_max_remaining: Decimal,
    /// True when any query override replaced a plan default
    pub overridden: bool,
}

/// Where the provider's rate sits among all providers for the plan
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriceContext {
    pub ranking: Option<PriceRanking>,
    pub vs_average: Option<PriceComparison>,
    pub stats: Option<PriceStats>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CostEstimateResponse {
    pub procedure: Procedure,
    pub provider: Provider,
    pub plan: PayerPlan,
    pub negotiated_rate: NegotiatedRate,
    pub inputs: EstimateInputs,
    pub result: LiabilityResult,
    pub statement: CostStatement,
    pub price_context: PriceContext,
}

/// Estimate out-of-pocket cost for a procedure at a provider under a plan
#[utoipa::path(
    get,
    path = "/api/v1/cost/{procedure}/{provider}/{plan}",
    tag = "cost",
    params(
        ("procedure" = String, Path, description = "Procedure slug", example = "total-hip-replacement"),
        ("provider" = String, Path, description = "Provider slug", example = "mayo-clinic-rochester"),
        ("plan" = String, Path, description = "Plan slug", example = "uhc-choice-plus"),
        CostQuery
    ),
    responses(
        (status = 200, description = "Cost estimate computed", body = CostEstimateResponse),
        (status = 400, description = "Invalid override", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Unknown procedure, provider, plan or rate", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn estimate_cost(
    State(server): State<CareCostServer>,
    Path((procedure_slug, provider_slug, plan_slug)): Path<(String, String, String)>,
    query: Result<Query<CostQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CostEstimateResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let overrides = PlanOverrides::from(query);

    let catalog = &server.catalog;
    let quote = catalog.quote(&procedure_slug, &provider_slug, &plan_slug)?;
    let estimate = quote.estimate(&overrides)?;

    let sharing = quote.plan.cost_sharing.apply(&overrides);
    let inputs = EstimateInputs {
        remaining_deductible: estimate.input.remaining_deductible(),
        coinsurance_percent: sharing.coinsurance_percent,
        coinsurance_rate: estimate.input.coinsurance_rate(),
        out_of_pocket_max_remaining: estimate.input.out_of_pocket_max_remaining(),
        overridden: !overrides.is_empty(),
    };

    let cpt = quote.procedure.cpt_code.as_str();
    let npi = quote.provider.npi.as_str();
    let plan = quote.plan.slug.as_str();
    let price_context = PriceContext {
        ranking: catalog.provider_ranking(cpt, npi, plan),
        vs_average: catalog.price_vs_average(cpt, npi, plan),
        stats: catalog.price_stats(cpt, plan),
    };

    tracing::debug!(
        procedure = %procedure_slug,
        provider = %provider_slug,
        plan = %plan_slug,
        negotiated_rate = %quote.rate.negotiated_rate,
        total_liability = %estimate.result.total_liability,
        "Cost estimate computed"
    );

    let response = CostEstimateResponse {
        procedure: quote.procedure.clone(),
        provider: quote.provider.clone(),
        plan: quote.plan.clone(),
        negotiated_rate: quote.rate.clone(),
        inputs,
        result: estimate.result,
        statement: estimate.statement,
        price_context,
    };

    Ok(Json(api_success(response)))
}
