//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::headers::HeadersCommands;
use commands::sync::SyncCommands;

#[derive(Parser, Debug)]
#[command(name = "catalog-sync")]
#[command(about = "Push catalog spreadsheet rows to the recommendation and registration APIs")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit every unprocessed row and write the results back
    Sync(SyncCommands),
    /// Check the header row and print the resolved columns
    Headers(HeadersCommands),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from([
            "catalog-sync",
            "sync",
            "--dry-run",
            "--limit",
            "3",
            "--csv",
            "rows.csv",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.dry_run);
                assert_eq!(args.limit, Some(3));
                assert_eq!(args.csv, Some(PathBuf::from("rows.csv")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_headers_with_config() {
        let cli =
            Cli::try_parse_from(["catalog-sync", "--config", "c.toml", "headers"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Commands::Headers(_)));
    }

    #[test]
    fn test_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["catalog-sync", "sync", "--limit", "0"]).is_err());
    }
}
