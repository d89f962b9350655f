use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "memberbase")]
#[command(about = "In-memory member record store", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        env = "MEMBERBASE_CONFIG",
        help = "TOML config file (logging section)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log level (overrides config and environment)")]
    pub log_level: Option<String>,

    #[arg(long, help = "Absolute log directory (overrides config and environment)")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check core linkage")]
    Ping,

    #[command(about = "Print the core version")]
    Version,

    #[command(about = "Run the follow-then-delete scenario on a fresh store")]
    Demo,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_overrides_before_subcommand() {
        let cli = Cli::try_parse_from([
            "memberbase",
            "--config",
            "/etc/memberbase.toml",
            "--log-level",
            "warn",
            "demo",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Demo));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/memberbase.toml"))
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["memberbase"]).is_err());
    }
}
