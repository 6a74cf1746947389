//! Command-line front end for CareCost
//!
//! Subcommands:
//! - `estimate`: raw liability from a negotiated rate
//! - `quote`: catalog-backed estimate with the itemised statement
//! - `plans`: plan listing with cost sharing
//! - `verify`: reference scenarios plus a catalog smoke check
//!
//! # Example Usage
//!
//! ```bash
//! carecost estimate --rate 25000 --deductible 5000 --coinsurance 0.2 --oop-max 10000
//! carecost quote total-hip-replacement mayo-clinic-rochester uhc-choice-plus --deductible 2000
//! carecost plans --payer aetna
//! carecost verify
//! ```

pub mod cli;
pub mod commands;
pub mod verify;

pub use cli::{Cli, Command};
pub use commands::run;
