mod cmd;
mod config;
mod ctx;
mod error;

use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use cmd::{Commands, Success};
use config::Config;
use ctx::Ctx;
use error::Result;
use tracing::{error, trace};

// Gridmon, a home-energy telemetry console.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten, next_help_heading = "Global Options")]
    globals: Globals,

    #[command(subcommand, next_help_heading = "Options")]
    command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct Globals {
    /// Path to the configuration file.
    ///
    /// Defaults to `gridmon.toml` in the current directory; missing files
    /// fall back to built-in defaults.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase verbosity of logging.
    ///
    /// Can be specified multiple times to increase verbosity.
    ///
    /// Defaults to printing "error" messages. For each increase in verbosity,
    /// the log level is set to "warn", "info", "debug", and "trace"
    /// respectively.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output, including errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[tokio::main]
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.globals.quiet;

    configure_logging(cli.globals.verbose, quiet);
    trace!(command = cli.command.name(), "Starting CLI run.");

    match run_inner(cli).await {
        Ok(Success::Ok) => ExitCode::SUCCESS,
        Ok(Success::Message(message)) => {
            if !quiet && !message.is_empty() {
                println!("{message}");
            }

            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(%error, "Command failed.");
            if !quiet {
                eprintln!("{error}");
            }

            ExitCode::FAILURE
        }
    }
}

async fn run_inner(cli: Cli) -> Result<Success> {
    let config = Config::load(cli.globals.config.as_deref())?;
    let ctx = Ctx::new(config);

    cli.command.run(&ctx).await
}

fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let mut filter = vec!["off".to_owned()];
    for krate in [
        "cli",
        "client",
        "queue",
        "replay",
        "telemetry",
        "transcript",
    ] {
        filter.push(format!("gm_{krate}={level}"));
    }

    let format = fmt::format().with_target(false).compact();

    if level < LevelFilter::DEBUG {
        tracing_subscriber::fmt()
            .event_format(format)
            .without_time()
            .with_ansi(true)
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    } else {
        tracing_subscriber::fmt()
            .event_format(format)
            .with_ansi(true)
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }
}
