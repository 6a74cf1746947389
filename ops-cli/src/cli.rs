use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// CareCost command-line estimator
#[derive(Parser, Debug)]
#[command(name = "carecost", version)]
#[command(about = "Estimate patient out-of-pocket cost from negotiated rates")]
pub struct Cli {
    /// Configuration file path (YAML or TOML)
    #[arg(short, long, global = true, env = "CARECOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute liability from a raw negotiated rate
    Estimate(EstimateArgs),
    /// Estimate a procedure at a provider under a catalog plan
    Quote(QuoteArgs),
    /// List payer plans and their cost sharing
    Plans(PlansArgs),
    /// Run the reference scenarios and a catalog smoke check
    Verify,
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Negotiated rate in dollars
    #[arg(long)]
    pub rate: Decimal,

    /// Remaining deductible in dollars
    #[arg(long)]
    pub deductible: Option<Decimal>,

    /// Coinsurance as a fraction in [0, 1], e.g. 0.2
    #[arg(long)]
    pub coinsurance: Option<Decimal>,

    /// Remaining out-of-pocket maximum in dollars
    #[arg(long)]
    pub oop_max: Option<Decimal>,

    /// Print JSON instead of a statement
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Procedure slug, e.g. total-hip-replacement
    pub procedure: String,

    /// Provider slug, e.g. mayo-clinic-rochester
    pub provider: String,

    /// Plan slug, e.g. uhc-choice-plus
    pub plan: String,

    /// Remaining deductible, replacing the plan's
    #[arg(long)]
    pub deductible: Option<Decimal>,

    /// Coinsurance percentage, replacing the plan's
    #[arg(long)]
    pub coinsurance_percent: Option<Decimal>,

    /// Remaining out-of-pocket maximum, replacing the plan's
    #[arg(long)]
    pub oop_max: Option<Decimal>,

    /// Print JSON instead of a statement
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlansArgs {
    /// Case-insensitive payer name filter
    #[arg(long)]
    pub payer: Option<String>,

    /// PPO, HMO, EPO, POS or HDHP
    #[arg(long)]
    pub network_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::try_parse_from([
            "carecost",
            "estimate",
            "--rate",
            "25000",
            "--coinsurance",
            "0.2",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Estimate(args) => {
                assert_eq!(args.rate, dec!(25000));
                assert_eq!(args.coinsurance, Some(dec!(0.2)));
                assert!(args.deductible.is_none());
                assert!(args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_quote_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "carecost",
            "quote",
            "mri-brain",
            "mass-general",
            "aetna-open-access",
            "--oop-max",
            "4000",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Quote(args) => {
                assert_eq!(args.procedure, "mri-brain");
                assert_eq!(args.oop_max, Some(dec!(4000)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rate_must_be_a_number() {
        assert!(Cli::try_parse_from(["carecost", "estimate", "--rate", "lots"]).is_err());
    }
}
