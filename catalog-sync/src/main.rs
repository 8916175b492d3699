mod api;
mod catalog;
mod cli;
mod config;
mod sheets;
mod sync;

use anyhow::Result;
use clap::Parser;

use cli::commands::headers::handle_headers_command;
use cli::commands::sync::handle_sync_command;
use cli::{Cli, Commands};
use config::Config;
use sheets::MissingHeaders;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<MissingHeaders>() {
            Some(missing) => log::error!("{}", missing),
            None => log::error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync(args) => handle_sync_command(args, &config).await,
        Commands::Headers(args) => handle_headers_command(args, &config).await,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}
