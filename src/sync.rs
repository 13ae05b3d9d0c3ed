use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::io::excel_write;
use crate::io::http::Transport;
use crate::io::nyt;
use crate::layout::{CoverLoader, Report, SheetNameRegistry, build_sheet};

/// Name of the workbook produced on `run_date`, e.g.
/// `results/September 06 New York Bestsellers.xlsx`.
pub fn output_path(output_dir: &Path, run_date: NaiveDate) -> PathBuf {
    output_dir.join(format!(
        "{} New York Bestsellers.xlsx",
        run_date.format("%B %d")
    ))
}

/// Fetches every enabled list and lays it out, one list after another.
#[instrument(level = "info", skip_all)]
pub fn build_report(config: &Config, transport: &dyn Transport) -> Result<Report> {
    if config.enabled_lists().next().is_none() {
        return Err(ToolError::NoListsEnabled);
    }

    let covers = CoverLoader::new(transport, config.render.strict_images);
    let mut sheet_names = SheetNameRegistry::default();
    let mut report = Report::default();

    for identifier in config.enabled_lists() {
        let list = nyt::fetch_list(transport, &config.api, identifier)?;
        let sheet_name = sheet_names.assign(&list.title());
        let sheet = build_sheet(&list, sheet_name, &config.organization, &covers)?;
        report.sheets.push(sheet);
    }

    Ok(report)
}

/// Synchronises the current bestseller lists into a dated workbook and
/// returns its path. Nothing is written unless every list succeeds.
#[instrument(
    level = "info",
    skip(config, transport),
    fields(output_dir = %config.output_dir.display())
)]
pub fn sync_bestsellers(
    config: &Config,
    transport: &dyn Transport,
    run_date: NaiveDate,
) -> Result<PathBuf> {
    let report = build_report(config, transport)?;
    let path = output_path(&config.output_dir, run_date);
    excel_write::write_workbook(&path, &report)?;
    info!(
        path = %path.display(),
        sheet_count = report.sheets.len(),
        "workbook written"
    );
    Ok(path)
}
