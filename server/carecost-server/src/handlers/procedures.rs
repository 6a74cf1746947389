use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use error_common::codes;
use price_catalog::{ContractType, PayerPlan, PriceStats, Procedure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareCostServer;
use crate::validate_field;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    /// Plan slug the rates are negotiated under
    #[param(example = "uhc-choice-plus")]
    pub plan: Option<String>,
}

/// One provider's rate in a price comparison
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProviderPrice {
    /// 1-based, cheapest first
    pub rank: usize,
    pub provider_npi: String,
    pub provider_slug: String,
    pub provider_name: String,
    pub city: String,
    pub state: String,
    pub negotiated_rate: Decimal,
    pub contract_type: ContractType,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProcedurePricesResponse {
    pub procedure: Procedure,
    pub plan: PayerPlan,
    pub stats: Option<PriceStats>,
    pub prices: Vec<ProviderPrice>,
}

/// List every procedure in the catalog
#[utoipa::path(
    get,
    path = "/api/v1/procedures",
    tag = "procedures",
    responses(
        (status = 200, description = "All procedures", body = [Procedure])
    )
)]
pub async fn list_procedures(
    State(server): State<CareCostServer>,
) -> Result<Json<ApiResponse<Vec<Procedure>>>, ApiError> {
    Ok(Json(api_success(server.catalog.procedures().to_vec())))
}

/// Compare every provider's rate for a procedure under one plan
#[utoipa::path(
    get,
    path = "/api/v1/procedures/{slug}/prices",
    tag = "procedures",
    params(
        ("slug" = String, Path, description = "Procedure slug", example = "mri-brain"),
        PriceQuery
    ),
    responses(
        (status = 200, description = "Rates ascending with summary statistics", body = ProcedurePricesResponse),
        (status = 400, description = "Missing plan parameter", body = crate::error::ApiErrorResponse),
        (status = 404, description = "Unknown procedure or plan", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn procedure_prices(
    State(server): State<CareCostServer>,
    Path(slug): Path<String>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProcedurePricesResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let plan_slug = query.plan.unwrap_or_default();
    validate_field!(
        "plan",
        !plan_slug.trim().is_empty(),
        "plan query parameter is required"
    );

    let catalog = &server.catalog;
    let procedure = catalog.procedure_by_slug(&slug).ok_or_else(|| {
        ApiError::not_found(format!("procedure {slug}"), codes::lookup::PROCEDURE_NOT_FOUND)
    })?;
    let plan = catalog.plan_by_slug(&plan_slug).ok_or_else(|| {
        ApiError::not_found(format!("plan {plan_slug}"), codes::lookup::PLAN_NOT_FOUND)
    })?;

    let prices: Vec<ProviderPrice> = catalog
        .rates_for_procedure_by_plan(&procedure.cpt_code, &plan.slug)
        .into_iter()
        .filter_map(|rate| {
            catalog
                .provider_by_npi(&rate.provider_npi)
                .map(|provider| (provider, rate))
        })
        .enumerate()
        .map(|(index, (provider, rate))| ProviderPrice {
            rank: index + 1,
            provider_npi: provider.npi.clone(),
            provider_slug: provider.slug.clone(),
            provider_name: provider.name.clone(),
            city: provider.city.clone(),
            state: provider.state.clone(),
            negotiated_rate: rate.negotiated_rate,
            contract_type: rate.contract_type,
        })
        .collect();

    let response = ProcedurePricesResponse {
        procedure: procedure.clone(),
        plan: plan.clone(),
        stats: catalog.price_stats(&procedure.cpt_code, &plan.slug),
        prices,
    };

    Ok(Json(api_success(response)))
}
