pub mod paths;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{cost, health, liability, plans, procedures, providers};
use crate::openapi;
use crate::server::CareCostServer;

/// Create all application routes
pub fn create_routes() -> Router<CareCostServer> {
    Router::new()
        .merge(health_routes())
        .route(paths::OPENAPI_JSON, get(openapi::openapi_json))
        .nest(paths::API_V1, api_v1_routes())
}

fn health_routes() -> Router<CareCostServer> {
    Router::new()
        .route(paths::HEALTH, get(health::health_check))
        .route(paths::VERSION, get(health::version_info))
}

fn api_v1_routes() -> Router<CareCostServer> {
    Router::new()
        .route(paths::liability::ESTIMATE, post(liability::estimate_liability))
        .route(paths::cost::QUOTE, get(cost::estimate_cost))
        .route(paths::plans::BASE, get(plans::list_plans))
        .route(paths::plans::BY_SLUG, get(plans::get_plan))
        .route(paths::procedures::BASE, get(procedures::list_procedures))
        .route(paths::procedures::PRICES, get(procedures::procedure_prices))
        .route(paths::providers::BASE, get(providers::list_providers))
}
