//! Sync command handler

use anyhow::Result;
use colored::*;
use std::time::Instant;

use super::SyncCommands;
use crate::api::{Dispatcher, HttpPoster};
use crate::catalog::RowMapper;
use crate::cli::commands::open_sheet;
use crate::config::Config;
use crate::sync::{SyncOptions, SyncReport, SyncRunner, resolve_headers};

/// Run the sync against the configured worksheet
pub async fn handle_sync_command(args: SyncCommands, config: &Config) -> Result<()> {
    let start = Instant::now();
    let http = reqwest::Client::new();

    let sheet = open_sheet(config, &http, args.csv).await?;
    let headers = resolve_headers(sheet.as_ref()).await?;

    let mapper = RowMapper::new(headers, config.more_like_this_base.clone());
    let dispatcher = Dispatcher::new(HttpPoster::new(http), config.recommendation_url.clone());
    let options = SyncOptions {
        dry_run: args.dry_run,
        limit: args.limit,
        abort_on_registration_error: config.abort_on_registration_error,
    };

    if options.dry_run {
        println!("{}", "Dry run: no API calls or write-back".yellow());
    }

    let report = SyncRunner::new(sheet.as_ref(), &dispatcher, mapper, options)
        .run()
        .await?;

    print_summary(&report);
    println!("Total time: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(report: &SyncReport) {
    println!();
    println!("{}", "Summary".bold());
    println!("  Rows seen:     {}", report.rows_seen);
    println!("  Completed:     {}", report.completed.to_string().bright_green());
    if report.previewed > 0 {
        println!("  Previewed:     {}", report.previewed.to_string().cyan());
    }
    println!("  Skipped:       {}", report.skipped.to_string().dimmed());

    let failed = report.failed();
    let failed_text = if failed > 0 {
        failed.to_string().red().bold()
    } else {
        failed.to_string().normal()
    };
    println!(
        "  Failed:        {} (mapping {}, recommendation {}, registration {})",
        failed_text,
        report.mapping_failed,
        report.recommendation_rejected,
        report.registration_failed
    );
    println!(
        "  Cells written: {} in {} batch(es)",
        report.cells_written, report.flushes
    );
}
