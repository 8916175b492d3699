//! Command implementations

pub mod headers;
pub mod sync;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::sheets::{AccessToken, CsvSheet, GoogleSheet, ServiceAccountKey, SheetSource};

/// Open the worksheet named by the config, or a local CSV file when given
pub async fn open_sheet(
    config: &Config,
    http: &reqwest::Client,
    csv: Option<PathBuf>,
) -> Result<Box<dyn SheetSource>> {
    if let Some(path) = csv {
        log::info!("Using local CSV file {}", path.display());
        return Ok(Box::new(CsvSheet::new(path)));
    }

    let token = match &config.access_token {
        Some(token) => AccessToken::new(token.clone()),
        None => {
            let key = ServiceAccountKey::from_file(&config.credentials_file)?;
            key.fetch_token(http)
                .await
                .context("Failed to authenticate with the service account")?
        }
    };

    Ok(Box::new(GoogleSheet::new(
        http.clone(),
        token,
        config.spreadsheet_id.clone(),
        config.worksheet.clone(),
    )))
}
