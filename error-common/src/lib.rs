//! Common error handling utilities for CareCost Engine
//!
//! Provides the error enum shared by the CareCost front ends, the standard
//! error code strings that every crate maps its own errors onto, and a
//! structured logging helper.
//!
//! # Error Categories
//!
//! - **Validation**: caller supplied amounts or rates outside their domain
//! - **NotFound**: unknown procedure, provider, plan or missing rate
//! - **Config**: settings that failed to load or validate
//! - **Server / Network**: bootstrap and socket failures
//! - **Internal**: everything else
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, log_error, CareCostError};
//!
//! fn check_rate(rate: f64) -> error_common::Result<f64> {
//!     if rate < 0.0 {
//!         return Err(CareCostError::Validation(format!(
//!             "[{}] negotiated rate must be non-negative",
//!             codes::validation::NEGATIVE_AMOUNT
//!         )));
//!     }
//!     Ok(rate)
//! }
//!
//! if let Err(e) = check_rate(-1.0) {
//!     log_error("check_rate", &e);
//! }
//! ```

pub mod codes;
pub mod types;

pub use types::*;
