//! Command-line interface argument parsing and definitions
//!
//! The command tree mirrors the API surface: read-style commands under
//! `get`, and the same operations grouped by service under `mosapi` and
//! `rri`. Every command resolves to one [`Operation`].

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// ICANN client CLI - MOSAPI monitoring, METRICA reports and RRI escrow status
///
/// `--version` selects the API version, so the program version flag is
/// disabled.
#[derive(Parser, Debug)]
#[command(
    name = "icann",
    author,
    about,
    long_about = None,
    disable_version_flag = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "json-pretty")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Target, credentials and API routing, shared by every API command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// TLD (e.g. example); required unless set in the credentials profile
    #[arg(long, global = true)]
    pub tld: Option<String>,

    /// Environment: prod or ote
    #[arg(long = "env", global = true)]
    pub environment: Option<String>,

    /// Auth type: basic or tlsa
    #[arg(long = "auth", global = true)]
    pub auth_type: Option<String>,

    /// Username for basic auth
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Password for basic auth
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// PEM-encoded client certificate for TLSA (literal \n escapes allowed)
    #[arg(long, global = true)]
    pub cert_pem: Option<String>,

    /// PEM-encoded client key for TLSA (literal \n escapes allowed)
    #[arg(long, global = true)]
    pub key_pem: Option<String>,

    /// API version (default v2)
    #[arg(long = "version", global = true)]
    pub api_version: Option<String>,

    /// Entity: ry or rr (default ry)
    #[arg(long, global = true)]
    pub entity: Option<String>,

    /// Credentials profile (default: --tld, then ICANN_PROFILE, then "default")
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Credentials file (default: ICANN_SHARED_CREDENTIALS_FILE or ~/.icann/credentials)
    #[arg(short, long, global = true)]
    pub credentials_file: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Whether any authentication flag was given on the command line
    pub fn has_auth_flags(&self) -> bool {
        [
            &self.auth_type,
            &self.username,
            &self.password,
            &self.cert_pem,
            &self.key_pem,
        ]
        .iter()
        .any(|flag| flag.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// Profile to look up: `--profile`, otherwise the `--tld` value
    pub fn chosen_profile(&self) -> Option<&str> {
        [&self.profile, &self.tld]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get resources
    Get(GetArgs),

    /// MOSAPI operations
    Mosapi(MosapiArgs),

    /// RRI operations
    Rri(RriArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(subcommand)]
    pub command: GetCommand,
}

#[derive(Subcommand, Debug)]
pub enum GetCommand {
    /// Get MOSAPI monitoring state
    State,

    /// TLD operations
    Tld {
        #[command(subcommand)]
        command: TldCommand,
    },

    /// Domain METRICA reports
    Metrica {
        #[command(subcommand)]
        command: MetricaCommand,
    },

    /// Registry escrow operations
    Escrow {
        #[command(subcommand)]
        command: EscrowCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum TldCommand {
    /// Get TLD monitoring status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum MetricaCommand {
    /// Get the latest METRICA domain list report
    Latest,

    /// Get the METRICA domain list report for a date
    Date(MetricaDateArgs),

    /// List available METRICA reports
    Lists(MetricaListsArgs),
}

#[derive(Args, Debug)]
pub struct MetricaDateArgs {
    /// Report date
    #[arg(value_name = "YYYY-MM-DD")]
    pub date: NaiveDate,
}

#[derive(Args, Debug)]
pub struct MetricaListsArgs {
    /// Filter: start date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<NaiveDate>,

    /// Filter: end date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum EscrowCommand {
    /// Check the registry escrow report status for a date
    Status(EscrowStatusArgs),
}

#[derive(Args, Debug)]
pub struct EscrowStatusArgs {
    /// Report date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: NaiveDate,
}

#[derive(Args, Debug)]
pub struct MosapiArgs {
    #[command(subcommand)]
    pub command: MosapiCommand,
}

#[derive(Subcommand, Debug)]
pub enum MosapiCommand {
    /// Get MOSAPI monitoring state
    State,

    /// Domain METRICA reports
    Metrica {
        #[command(subcommand)]
        command: MetricaCommand,
    },
}

#[derive(Args, Debug)]
pub struct RriArgs {
    #[command(subcommand)]
    pub command: RriCommand,
}

#[derive(Subcommand, Debug)]
pub enum RriCommand {
    /// Get RRI resources
    Get {
        #[command(subcommand)]
        command: RriGetCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RriGetCommand {
    /// Registry escrow operations
    Escrow {
        #[command(subcommand)]
        command: EscrowCommand,
    },
}

/// Arguments for generating shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Human,
    /// Compact JSON
    Json,
    /// Indented JSON
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// A single API call, independent of the command path that named it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    State,
    MetricaLatest,
    MetricaByDate(NaiveDate),
    MetricaLists {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    EscrowStatus(NaiveDate),
}

impl From<&MetricaCommand> for Operation {
    fn from(command: &MetricaCommand) -> Self {
        match command {
            MetricaCommand::Latest => Operation::MetricaLatest,
            MetricaCommand::Date(args) => Operation::MetricaByDate(args.date),
            MetricaCommand::Lists(args) => Operation::MetricaLists {
                start_date: args.start_date,
                end_date: args.end_date,
            },
        }
    }
}

impl From<&EscrowCommand> for Operation {
    fn from(command: &EscrowCommand) -> Self {
        match command {
            EscrowCommand::Status(args) => Operation::EscrowStatus(args.date),
        }
    }
}

impl Commands {
    /// The API call this command performs; `None` for local-only commands
    pub fn operation(&self) -> Option<Operation> {
        let operation = match self {
            Commands::Get(args) => match &args.command {
                GetCommand::State | GetCommand::Tld { command: TldCommand::Status } => Operation::State,
                GetCommand::Metrica { command } => command.into(),
                GetCommand::Escrow { command } => command.into(),
            },
            Commands::Mosapi(args) => match &args.command {
                MosapiCommand::State => Operation::State,
                MosapiCommand::Metrica { command } => command.into(),
            },
            Commands::Rri(args) => match &args.command {
                RriCommand::Get {
                    command: RriGetCommand::Escrow { command },
                } => command.into(),
            },
            Commands::Completions(_) => return None,
        };
        Some(operation)
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stderr().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("icann").chain(args.iter().copied())).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_paths_resolve_to_operations() {
        let cases: Vec<(&[&str], Operation)> = vec![
            (&["get", "state"], Operation::State),
            (&["get", "tld", "status"], Operation::State),
            (&["mosapi", "state"], Operation::State),
            (&["get", "metrica", "latest"], Operation::MetricaLatest),
            (&["mosapi", "metrica", "latest"], Operation::MetricaLatest),
            (
                &["get", "metrica", "date", "2025-01-05"],
                Operation::MetricaByDate(date("2025-01-05")),
            ),
            (
                &["get", "metrica", "lists", "--start-date", "2025-01-01"],
                Operation::MetricaLists {
                    start_date: Some(date("2025-01-01")),
                    end_date: None,
                },
            ),
            (
                &["get", "escrow", "status", "--date", "2025-10-22"],
                Operation::EscrowStatus(date("2025-10-22")),
            ),
            (
                &["rri", "get", "escrow", "status", "--date", "2025-10-22"],
                Operation::EscrowStatus(date("2025-10-22")),
            ),
        ];

        for (args, expected) in cases {
            assert_eq!(parse(args).command.operation(), Some(expected), "args: {:?}", args);
        }
        assert_eq!(parse(&["completions", "bash"]).command.operation(), None);
    }

    #[test]
    fn test_global_flags_anywhere() {
        let cli = parse(&[
            "get", "state", "--tld", "example", "--env", "ote", "--version", "v2", "--entity", "rr", "-p", "work",
        ]);
        assert_eq!(cli.connection.tld.as_deref(), Some("example"));
        assert_eq!(cli.connection.environment.as_deref(), Some("ote"));
        assert_eq!(cli.connection.api_version.as_deref(), Some("v2"));
        assert_eq!(cli.connection.entity.as_deref(), Some("rr"));
        assert_eq!(cli.connection.chosen_profile(), Some("work"));
        assert_eq!(cli.output, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_escrow_requires_valid_date() {
        assert!(Cli::try_parse_from(["icann", "get", "escrow", "status"]).is_err());
        assert!(Cli::try_parse_from(["icann", "get", "escrow", "status", "--date", "22/10/2025"]).is_err());
    }

    #[test]
    fn test_chosen_profile_falls_back_to_tld() {
        let args = ConnectionArgs {
            tld: Some("example".into()),
            ..ConnectionArgs::default()
        };
        assert_eq!(args.chosen_profile(), Some("example"));
        assert_eq!(ConnectionArgs::default().chosen_profile(), None);
    }

    #[test]
    fn test_has_auth_flags() {
        assert!(!ConnectionArgs::default().has_auth_flags());
        let args = ConnectionArgs {
            tld: Some("example".into()),
            ..ConnectionArgs::default()
        };
        assert!(!args.has_auth_flags());
        let args = ConnectionArgs {
            key_pem: Some("KEY".into()),
            ..ConnectionArgs::default()
        };
        assert!(args.has_auth_flags());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = parse(&["-vv", "get", "state"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = parse(&["--quiet", "get", "state"]);
        assert_eq!(cli.verbosity_level(), 0);
    }
}
