//! Local CSV file standing in for a worksheet

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{PendingUpdate, SheetSource};

/// A CSV file where record 1 is the header row. Records may be ragged.
#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<Vec<String>>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to open CSV file: {}", self.path.display()))?;
        parse_rows(&content)
            .with_context(|| format!("Failed to parse CSV file: {}", self.path.display()))
    }

    fn write_records(&self, rows: &[Vec<String>]) -> Result<()> {
        let tmp = self.path.with_extension("csv.tmp");
        std::fs::write(&tmp, render_rows(rows)?)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Split file content into rows, one per physical line.
///
/// A blank line is an empty row so row numbers match the file. A quoted field
/// may span lines; its record then counts as a single row.
fn parse_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut record = String::new();
    let mut open_quote = false;

    for line in content.lines() {
        if open_quote {
            record.push('\n');
        }
        record.push_str(line);
        open_quote = record.matches('"').count() % 2 == 1;
        if open_quote {
            continue;
        }
        let row_number = rows.len() + 1;
        let row = parse_record(&record)
            .with_context(|| format!("Failed to parse row {}", row_number))?;
        rows.push(row);
        record.clear();
    }

    if open_quote {
        bail!("Unterminated quoted field in row {}", rows.len() + 1);
    }
    Ok(rows)
}

fn parse_record(text: &str) -> Result<Vec<String>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|c| c.to_string()).collect()),
        None => Ok(Vec::new()),
    }
}

/// Inverse of [`parse_rows`]: empty rows become blank lines
fn render_rows(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for row in rows {
        if row.is_empty() {
            out.push(b'\n');
            continue;
        }
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record(row)?;
        let line = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to encode CSV row: {}", e.error()))?;
        out.extend_from_slice(&line);
    }
    Ok(out)
}

/// Apply cell writes in memory, growing short rows with blank cells
fn apply_updates(rows: &mut Vec<Vec<String>>, updates: &[PendingUpdate]) -> Result<()> {
    for update in updates {
        if update.cell.row == 0 || update.cell.col == 0 {
            bail!("Invalid cell address {:?}", update.cell);
        }
        let r = update.cell.row as usize - 1;
        let c = update.cell.col as usize - 1;
        if rows.len() <= r {
            rows.resize_with(r + 1, Vec::new);
        }
        let row = &mut rows[r];
        if row.len() <= c {
            row.resize(c + 1, String::new());
        }
        row[c] = update.value.clone();
    }
    Ok(())
}

#[async_trait]
impl SheetSource for CsvSheet {
    fn describe(&self) -> String {
        format!("CSV file {}", self.path().display())
    }

    async fn header_row(&self) -> Result<Vec<String>> {
        Ok(self.read_records()?.into_iter().next().unwrap_or_default())
    }

    async fn all_rows(&self) -> Result<Vec<Vec<String>>> {
        self.read_records()
    }

    async fn batch_update(&self, updates: &[PendingUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        let mut rows = self.read_records()?;
        apply_updates(&mut rows, updates)?;
        self.write_records(&rows)
    }
}
