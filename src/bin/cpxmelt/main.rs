use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod util;

const LOG_ENV: &str = "CPXMELT_LOG";

fn main() -> ExitCode {
    let cli = cli::parse();
    let common = cli.command.common();
    let ctx = display::Context::detect().with_quiet(common.quiet);

    init_logging(common.verbose, ctx.interactive);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Interactive runs render diagnostics as tables, so logging stays off
/// unless asked for.
fn init_logging(verbose: u8, interactive: bool) {
    let default = match (verbose, interactive) {
        (0, true) => "off",
        (0, false) => "warn",
        (1, _) => "cpx_melt=info,warn",
        _ => "cpx_melt=debug,info",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
