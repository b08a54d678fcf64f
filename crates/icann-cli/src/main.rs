//! icann - command-line client for the ICANN MOSAPI and RRI reporting APIs
//!
//! Resolves the target TLD and credentials from flags and the shared
//! credentials file, calls one endpoint and prints the result on stdout.

mod cli;
mod config;
mod credentials;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use error::Result;
use is_terminal::IsTerminal;
use logging::LoggingConfig;
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = init_logging(&cli) {
        eprintln!("{}", error::format_error(&e, cli.use_color()));
    }

    if let Err(e) = run(cli).await {
        eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
        process::exit(e.exit_code());
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = cli.command {
        return handlers::handle_completions(args, &mut std::io::stdout());
    }

    let Some(operation) = cli.command.operation() else {
        return Ok(());
    };

    let color = cli.use_color() && std::io::stdout().is_terminal();
    let mut output = OutputWriter::new(cli.output, color);
    handlers::handle_operation(operation, &cli.connection, &mut output).await
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut config = if cli.quiet {
        LoggingConfig::quiet()
    } else {
        LoggingConfig::from_verbosity(cli.verbosity_level())
    };
    config.ansi = cli.use_color();
    config.merge_with_env()?;

    logging::init_logging(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["icann", "--tld", "example", "get", "state"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.command.operation().is_some());

        let cli = Cli::parse_from(["icann", "-vv", "mosapi", "state"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["icann", "--quiet", "completions", "bash"]);
        assert!(cli.quiet);
        assert!(cli.command.operation().is_none());
    }
}
