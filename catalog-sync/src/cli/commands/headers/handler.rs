//! Headers command handler

use anyhow::Result;
use colored::*;

use super::HeadersCommands;
use crate::cli::commands::open_sheet;
use crate::config::Config;
use crate::sheets::Column;
use crate::sync::resolve_headers;

/// Resolve the header row and print where each required column lives
pub async fn handle_headers_command(args: HeadersCommands, config: &Config) -> Result<()> {
    let http = reqwest::Client::new();
    let sheet = open_sheet(config, &http, args.csv).await?;

    let headers = resolve_headers(sheet.as_ref()).await?;

    println!("{}", sheet.describe().bold());
    for column in Column::ALL {
        let index = headers.index(column);
        println!(
            "  {:<16} {}",
            column.header_name().cyan(),
            crate::sheets::column_letters(index).bright_green()
        );
    }

    let extra: Vec<&String> = headers
        .normalized()
        .iter()
        .filter(|h| !h.is_empty() && !Column::ALL.iter().any(|c| c.header_name() == h.as_str()))
        .collect();
    if !extra.is_empty() {
        println!(
            "  {} {}",
            "unused:".dimmed(),
            extra
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
                .dimmed()
        );
    }

    Ok(())
}
