//! Negotiated-rate catalog for CareCost
//!
//! Supplies the two inputs the liability engine needs:
//! - the negotiated rate for a procedure, provider and plan ([`RateLookup`])
//! - a plan's typical cost-sharing parameters ([`PlanDirectory`])
//!
//! The data set mirrors CMS Transparency-in-Coverage machine-readable files.
//! A seed catalog is compiled in; a YAML file with the same shape can replace
//! it at startup.

pub mod catalog;
pub mod error;
pub mod models;
pub mod pricing;
pub mod stats;

pub use catalog::*;
pub use error::*;
pub use models::*;
