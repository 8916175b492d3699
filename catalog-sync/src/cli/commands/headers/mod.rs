//! `headers` command

mod handler;

use clap::Args;
use std::path::PathBuf;

pub use handler::handle_headers_command;

#[derive(Args, Debug)]
pub struct HeadersCommands {
    /// Read a local CSV file instead of the Google worksheet
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
