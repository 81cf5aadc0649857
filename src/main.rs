//! orgpush - provision a GitHub organization repository and push to it.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use orgpush::Result;
use orgpush::app::{self, AppContext, RunReport};
use orgpush::cli::Cli;
use orgpush::cli::output::{emit_robot, robot_error, robot_ok};
use orgpush::cli::prompt::stdin_prompter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(report) => {
            if cli.robot {
                if let Err(err) = emit_robot(&robot_ok(report)) {
                    eprintln!("Error: {err}");
                    return ExitCode::FAILURE;
                }
            } else {
                app::emit_summary(&report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.robot {
                let response = robot_error(e.code(), e.to_string());
                if emit_robot(&response).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let ctx = AppContext::from_cli(cli)?;
    let mut prompter = stdin_prompter();
    let inputs = app::collect_inputs(cli.org.as_deref(), cli.repo.as_deref(), prompter.as_mut())?;
    app::run(&ctx, &inputs)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,orgpush=info",
        1 => "info,orgpush=debug",
        2 => "debug,orgpush=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
