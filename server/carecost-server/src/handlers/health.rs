use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::CareCostServer;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system health status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2025-12-15T10:30:00Z")]
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Seconds since the server started
    #[schema(example = 3600)]
    pub uptime: u64,
    /// Individual component checks
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    #[schema(example = "CareCost Engine")]
    pub name: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Reporting period of the loaded rate data
    #[schema(example = "2025-Q4")]
    pub reporting_period: String,
    /// Machine-readable file schema version of the loaded rate data
    #[schema(example = "1.0.0")]
    pub mrf_version: String,
    pub features: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(server): State<CareCostServer>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let catalog = &server.catalog;

    let mut checks = HashMap::new();
    checks.insert(
        "catalog".to_string(),
        format!(
            "healthy ({} procedures, {} providers, {} plans, {} rates)",
            catalog.procedures().len(),
            catalog.providers().len(),
            catalog.plans().len(),
            catalog.rate_count()
        ),
    );
    checks.insert("liability_engine".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_secs(),
        checks,
    };

    Ok(Json(api_success(response)))
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "health",
    responses(
        (status = 200, description = "Version information retrieved successfully", body = VersionResponse)
    )
)]
pub async fn version_info(
    State(server): State<CareCostServer>,
) -> Result<Json<ApiResponse<VersionResponse>>, ApiError> {
    let provenance = server.catalog.provenance();

    let features = vec![
        "liability-calculator".to_string(),
        "negotiated-rate-catalog".to_string(),
        "price-statistics".to_string(),
        "openapi".to_string(),
    ];

    let response = VersionResponse {
        name: "CareCost Engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        reporting_period: provenance.reporting_period.clone(),
        mrf_version: provenance.mrf_version.clone(),
        features,
    };

    Ok(Json(api_success(response)))
}
