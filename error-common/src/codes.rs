// Standardized error codes for CareCost Engine.
// Codes are stable strings surfaced in API error bodies and CLI logs.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const NEGATIVE_AMOUNT: &str = "VALIDATION_1002";
    pub const NON_FINITE_NUMBER: &str = "VALIDATION_1003";
    pub const RATE_OUT_OF_RANGE: &str = "VALIDATION_1004";
}

pub mod lookup {
    pub const PROCEDURE_NOT_FOUND: &str = "LOOKUP_2001";
    pub const PROVIDER_NOT_FOUND: &str = "LOOKUP_2002";
    pub const PLAN_NOT_FOUND: &str = "LOOKUP_2003";
    pub const RATE_NOT_FOUND: &str = "LOOKUP_2004";
}

pub mod catalog {
    pub const LOAD_FAILED: &str = "CATALOG_3001";
    pub const INVALID_DATA: &str = "CATALOG_3002";
}

pub mod config {
    pub const INVALID_CONFIG: &str = "CONFIG_4001";
}

pub mod internal {
    pub const UNEXPECTED: &str = "INTERNAL_5001";
}
