use std::io::Write;

use colored::Colorize;
use config_engine::Settings;
use error_common::{CareCostError, Result};
use liability_engine::{
    compute, format_usd, CostStatement, LiabilityError, LiabilityInput, LiabilityResult,
    PlanOverrides,
};
use price_catalog::{Catalog, CatalogError, NetworkType, PayerPlan};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cli::{Cli, Command, EstimateArgs, PlansArgs, QuoteArgs};
use crate::verify;

/// Fold a calculator error into the CLI error
pub fn liability_error(err: LiabilityError) -> CareCostError {
    CareCostError::Validation(err.to_string())
}

/// Fold a catalog error into the CLI error
pub fn catalog_error(err: CatalogError) -> CareCostError {
    match err {
        err if err.is_not_found() => CareCostError::NotFound(err.to_string()),
        CatalogError::CostSharing(inner) => liability_error(inner),
        CatalogError::Invalid(message) => CareCostError::Validation(message),
        err => CareCostError::Config(err.to_string()),
    }
}

fn io_error(err: std::io::Error) -> CareCostError {
    CareCostError::Internal(format!("Failed to write output: {err}"))
}

fn json_error(err: serde_json::Error) -> CareCostError {
    CareCostError::Internal(format!("Failed to encode JSON: {err}"))
}

/// Run the parsed command, writing results to `out`
///
/// # Errors
///
/// Returns the folded [`CareCostError`] for invalid input, unknown slugs,
/// catalog load failures and failed verification.
pub fn run(cli: &Cli, settings: &Settings, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Estimate(args) => estimate(args, settings, out),
        Command::Quote(args) => quote(args, &load_catalog(settings)?, out),
        Command::Plans(args) => plans(args, &load_catalog(settings)?, out),
        Command::Verify => verify(&load_catalog(settings)?, out),
    }
}

fn load_catalog(settings: &Settings) -> Result<Catalog> {
    Catalog::load_or_seed(settings.catalog.path.as_deref()).map_err(catalog_error)
}

#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    input: &'a LiabilityInput,
    result: &'a LiabilityResult,
}

/// Raw calculation; omitted plan parameters come from the configured defaults
///
/// # Errors
///
/// Returns [`CareCostError::Validation`] for out-of-range values.
pub fn estimate(args: &EstimateArgs, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let defaults = settings.estimate.cost_sharing();
    let deductible = args.deductible.unwrap_or(defaults.deductible);
    let coinsurance = args.coinsurance.unwrap_or_else(|| defaults.coinsurance_rate());
    let oop_max = args.oop_max.unwrap_or(defaults.out_of_pocket_max);

    let input = LiabilityInput::new(args.rate, deductible, coinsurance, oop_max)
        .map_err(liability_error)?;
    let result = compute(&input);

    if args.json {
        let report = EstimateReport {
            input: &input,
            result: &result,
        };
        let text = serde_json::to_string_pretty(&report).map_err(json_error)?;
        writeln!(out, "{text}").map_err(io_error)?;
        return Ok(());
    }

    let statement =
        CostStatement::build("Negotiated rate estimate", "Any provider", &input, &result);
    write!(out, "{}", statement.render_text()).map_err(io_error)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct QuoteReport<'a> {
    procedure: &'a str,
    provider: &'a str,
    plan: &'a str,
    negotiated_rate: Decimal,
    result: &'a LiabilityResult,
    statement: &'a CostStatement,
}

/// Catalog-backed estimate for one procedure, provider and plan
///
/// # Errors
///
/// Returns [`CareCostError::NotFound`] for unknown slugs and
/// [`CareCostError::Validation`] for out-of-range overrides.
pub fn quote(args: &QuoteArgs, catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let quote = catalog
        .quote(&args.procedure, &args.provider, &args.plan)
        .map_err(catalog_error)?;
    let overrides = PlanOverrides {
        remaining_deductible: args.deductible,
        coinsurance_percent: args.coinsurance_percent,
        out_of_pocket_max_remaining: args.oop_max,
    };
    let estimate = quote.estimate(&overrides).map_err(catalog_error)?;

    tracing::debug!(
        procedure = %args.procedure,
        provider = %args.provider,
        plan = %args.plan,
        total_liability = %estimate.result.total_liability,
        "Quote computed"
    );

    if args.json {
        let report = QuoteReport {
            procedure: &quote.procedure.slug,
            provider: &quote.provider.slug,
            plan: &quote.plan.slug,
            negotiated_rate: quote.rate.negotiated_rate,
            result: &estimate.result,
            statement: &estimate.statement,
        };
        let text = serde_json::to_string_pretty(&report).map_err(json_error)?;
        writeln!(out, "{text}").map_err(io_error)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} ({})",
        quote.plan.display_name().bold(),
        quote.plan.network_type
    )
    .map_err(io_error)?;
    writeln!(
        out,
        "Negotiated rate: {} (CPT {}, NPI {})",
        format_usd(quote.rate.negotiated_rate),
        quote.procedure.cpt_code,
        quote.provider.npi
    )
    .map_err(io_error)?;
    if let Some(ranking) = catalog.provider_ranking(
        &quote.procedure.cpt_code,
        &quote.provider.npi,
        &quote.plan.slug,
    ) {
        writeln!(
            out,
            "Price rank: {} of {} providers, percentile {} (100 is cheapest)",
            ranking.rank, ranking.total, ranking.percentile
        )
        .map_err(io_error)?;
    }
    writeln!(out).map_err(io_error)?;
    write!(out, "{}", estimate.statement.render_text()).map_err(io_error)?;
    Ok(())
}

/// List plans, optionally filtered
///
/// # Errors
///
/// Returns [`CareCostError::Validation`] for an unknown network type.
pub fn plans(args: &PlansArgs, catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let network_type = args
        .network_type
        .as_deref()
        .map(str::parse::<NetworkType>)
        .transpose()
        .map_err(catalog_error)?;

    let mut plans: Vec<&PayerPlan> = match args.payer.as_deref() {
        Some(payer) => catalog.plans_by_payer(payer),
        None => catalog.plans().iter().collect(),
    };
    if let Some(network_type) = network_type {
        plans.retain(|plan| plan.network_type == network_type);
    }

    writeln!(
        out,
        "{}",
        format!(
            "{:<26} {:<5} {:<40} {:>12} {:>6} {:>12}",
            "SLUG", "TYPE", "PLAN", "DEDUCTIBLE", "COINS", "OOP MAX"
        )
        .bold()
    )
    .map_err(io_error)?;
    for plan in &plans {
        let sharing = &plan.cost_sharing;
        writeln!(
            out,
            "{:<26} {:<5} {:<40} {:>12} {:>5}% {:>12}",
            plan.slug,
            plan.network_type.as_str(),
            plan.display_name(),
            format_usd(sharing.deductible),
            sharing.coinsurance_percent,
            format_usd(sharing.out_of_pocket_max)
        )
        .map_err(io_error)?;
    }
    writeln!(out, "{} plan(s)", plans.len()).map_err(io_error)?;
    Ok(())
}

/// Run every reference scenario and the catalog smoke check
///
/// # Errors
///
/// Returns [`CareCostError::Validation`] naming how many checks failed.
pub fn verify(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    let outcomes = verify::run_all(catalog);

    for outcome in &outcomes {
        let status = if outcome.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        writeln!(out, "{status} {} ({})", outcome.name, outcome.detail).map_err(io_error)?;
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    writeln!(
        out,
        "{} of {} checks passed",
        outcomes.len() - failed,
        outcomes.len()
    )
    .map_err(io_error)?;

    if failed > 0 {
        return Err(CareCostError::Validation(format!(
            "{failed} verification check(s) failed"
        )));
    }
    Ok(())
}
