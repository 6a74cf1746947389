use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use error_common::codes;
use price_catalog::{NetworkType, PayerPlan};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareCostServer;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlanQuery {
    /// Case-insensitive substring of the payer name
    #[param(example = "aetna")]
    pub payer: Option<String>,
    /// PPO, HMO, EPO, POS or HDHP
    #[param(example = "PPO")]
    pub network_type: Option<String>,
}

/// List plans, optionally filtered by payer and network type
#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "plans",
    params(PlanQuery),
    responses(
        (status = 200, description = "Matching plans", body = [PayerPlan]),
        (status = 400, description = "Unknown network type", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn list_plans(
    State(server): State<CareCostServer>,
    query: Result<Query<PlanQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PayerPlan>>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let network_type = query
        .network_type
        .as_deref()
        .map(str::parse::<NetworkType>)
        .transpose()
        .map_err(|err| {
            ApiError::field_validation(
                "network_type",
                err.to_string(),
                codes::validation::INVALID_INPUT,
            )
        })?;

    let catalog = &server.catalog;
    let mut plans: Vec<&PayerPlan> = match query.payer.as_deref() {
        Some(payer) => catalog.plans_by_payer(payer),
        None => catalog.plans().iter().collect(),
    };
    if let Some(network_type) = network_type {
        plans.retain(|plan| plan.network_type == network_type);
    }
    let plans: Vec<PayerPlan> = plans.into_iter().cloned().collect();

    Ok(Json(api_success(plans)))
}

/// Fetch one plan by slug
#[utoipa::path(
    get,
    path = "/api/v1/plans/{slug}",
    tag = "plans",
    params(("slug" = String, Path, description = "Plan slug", example = "aetna-open-access")),
    responses(
        (status = 200, description = "Plan found", body = PayerPlan),
        (status = 404, description = "Unknown plan", body = crate::error::ApiErrorResponse)
    )
)]
pub async fn get_plan(
    State(server): State<CareCostServer>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PayerPlan>>, ApiError> {
    let plan = server
        .catalog
        .plan_by_slug(&slug)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("plan {slug}"), codes::lookup::PLAN_NOT_FOUND))?;

    Ok(Json(api_success(plan)))
}
