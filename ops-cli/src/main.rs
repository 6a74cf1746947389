use std::process::ExitCode;

use clap::Parser;
use config_engine::Settings;
use error_common::{log_error, CareCostError, Result};

use carecost_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error("carecost", &err);
            eprintln!("error: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let settings =
        Settings::load(cli.config.as_deref()).map_err(|e| CareCostError::Config(e.to_string()))?;

    telemetry::init_tracing_with_writer(&settings.logging, cli.verbose, std::io::stderr)
        .map_err(|e| CareCostError::Config(e.to_string()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &settings, &mut out)
}
