//! Patient cost-liability engine for CareCost
//!
//! Given a procedure's negotiated rate and a patient's plan standing
//! (remaining deductible, coinsurance rate, remaining out-of-pocket maximum),
//! computes what the patient owes and what the plan pays for a single claim:
//! - Deductible absorbs the charge first
//! - Coinsurance applies to the remainder
//! - The out-of-pocket maximum caps the patient total
//!
//! The engine is a pure function over validated input. It performs no I/O,
//! holds no state and is safe to call from any number of threads. Money is
//! `rust_decimal::Decimal`, so the breakdown always sums exactly to the total.
//!
//! # Example
//!
//! ```rust
//! use liability_engine::{compute, LiabilityInput};
//! use rust_decimal::Decimal;
//!
//! let input = LiabilityInput::new(
//!     Decimal::from(25_000),
//!     Decimal::from(5_000),
//!     Decimal::new(20, 2),
//!     Decimal::from(10_000),
//! )?;
//! let result = compute(&input);
//! assert_eq!(result.total_liability, Decimal::from(9_000));
//! assert_eq!(result.breakdown.plan_pays, Decimal::from(16_000));
//! # Ok::<(), liability_engine::LiabilityError>(())
//! ```

pub mod calculator;
pub mod error;
pub mod models;
pub mod statement;

pub use calculator::*;
pub use error::*;
pub use models::*;
pub use statement::*;
