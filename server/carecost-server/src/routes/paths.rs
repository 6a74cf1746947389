//! Route path constants
//!
//! Paths under [`API_V1`] are relative to the nested router.

pub const HEALTH: &str = "/health";
pub const VERSION: &str = "/version";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

pub const API_V1: &str = "/api/v1";

pub mod liability {
    pub const ESTIMATE: &str = "/liability";
}

pub mod cost {
    pub const QUOTE: &str = "/cost/:procedure/:provider/:plan";
}

pub mod plans {
    pub const BASE: &str = "/plans";
    pub const BY_SLUG: &str = "/plans/:slug";
}

pub mod procedures {
    pub const BASE: &str = "/procedures";
    pub const PRICES: &str = "/procedures/:slug/prices";
}

pub mod providers {
    pub const BASE: &str = "/providers";
}
