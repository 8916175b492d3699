//! `sync` command

mod handler;

use clap::Args;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub use handler::handle_sync_command;

#[derive(Args, Debug)]
pub struct SyncCommands {
    /// Map rows and log payloads without calling the APIs or writing back
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many rows have been submitted
    #[arg(long, value_parser = parse_limit)]
    pub limit: Option<usize>,

    /// Read and update a local CSV file instead of the Google worksheet
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

fn parse_limit(s: &str) -> Result<usize, String> {
    s.parse::<NonZeroUsize>()
        .map(NonZeroUsize::get)
        .map_err(|_| format!("'{}' is not a positive number", s))
}
