//! Strap CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use strap::cli::Cli;
use strap::config::InstallConfig;
use strap::installer::Installer;
use strap::ui::Output;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("strap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strap=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Strap starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let out = Output::new(cli.quiet);

    let config = match InstallConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            out.error(&format!("Error: {e}"));
            return ExitCode::from(1);
        }
    };

    let installer = Installer::new(&config, &out);
    let result = if cli.dry_run {
        installer.report_only(cli.json)
    } else {
        installer.run()
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out.error(&format!("Error: {e}"));
            ExitCode::from(1)
        }
    }
}
