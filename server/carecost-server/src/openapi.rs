use axum::Json;
use utoipa::OpenApi;

use crate::error::ApiErrorResponse;
use crate::handlers::{cost, health, liability, plans, procedures, providers};

/// OpenAPI document for the CareCost API
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::version_info,
        liability::estimate_liability,
        cost::estimate_cost,
        plans::list_plans,
        plans::get_plan,
        procedures::list_procedures,
        procedures::procedure_prices,
        providers::list_providers,
    ),
    components(schemas(
        health::HealthResponse,
        health::VersionResponse,
        liability::LiabilityRequest,
        cost::EstimateInputs,
        cost::PriceContext,
        cost::CostEstimateResponse,
        procedures::ProviderPrice,
        procedures::ProcedurePricesResponse,
        ApiErrorResponse,
        liability_engine::LiabilityResult,
        liability_engine::LiabilityBreakdown,
        liability_engine::CostSharing,
        liability_engine::CostStatement,
        price_catalog::Procedure,
        price_catalog::Provider,
        price_catalog::PayerPlan,
        price_catalog::NegotiatedRate,
        price_catalog::PriceStats,
        price_catalog::PriceRanking,
        price_catalog::PriceComparison,
    )),
    tags(
        (name = "health", description = "Liveness and version information"),
        (name = "liability", description = "Raw patient liability calculation"),
        (name = "cost", description = "Catalog-backed out-of-pocket estimates"),
        (name = "plans", description = "Payer plans and their cost sharing"),
        (name = "procedures", description = "Procedures and negotiated-rate comparisons"),
        (name = "providers", description = "Facilities in the rate catalog")
    ),
    info(
        title = "CareCost Engine API",
        version = "0.1.0",
        description = "Out-of-pocket cost estimates from negotiated rates and plan cost sharing. \
                       Money values are decimal strings."
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
