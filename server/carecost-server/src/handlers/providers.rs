use axum::{extract::State, Json};
use price_catalog::Provider;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareCostServer;

/// List every provider in the catalog
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "providers",
    responses(
        (status = 200, description = "All providers", body = [Provider])
    )
)]
pub async fn list_providers(
    State(server): State<CareCostServer>,
) -> Result<Json<ApiResponse<Vec<Provider>>>, ApiError> {
    Ok(Json(api_success(server.catalog.providers().to_vec())))
}
