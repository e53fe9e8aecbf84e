//! File exports of in-memory rows.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::columns::Column;

mod csv;
mod pdf;
mod xlsx;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(String),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Generated file ready to be sent as an attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `{base}_{YYYY-MM-DD}.{ext}`
pub fn export_filename(base: &str, date: NaiveDate, format: ExportFormat) -> String {
    let base: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let base = if base.is_empty() { "export".to_string() } else { base };
    format!("{base}_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Header row and one row of cells per record.
fn tabulate<T>(rows: &[T], columns: &[Column<T>]) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let headers = columns.iter().map(|c| c.header).collect();
    let cells = rows
        .iter()
        .map(|row| columns.iter().map(|c| (c.value)(row)).collect())
        .collect();
    (headers, cells)
}

/// Renders `rows` in the requested format. Empty input is rejected.
pub fn export_rows<T>(
    rows: &[T],
    columns: &[Column<T>],
    format: ExportFormat,
    base: &str,
    date: NaiveDate,
) -> ExportResult<ExportFile> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let (headers, cells) = tabulate(rows, columns);
    let bytes = match format {
        ExportFormat::Csv => csv::render(&headers, &cells)?,
        ExportFormat::Xlsx => xlsx::render(base, &headers, &cells)?,
        ExportFormat::Pdf => pdf::render(base, &headers, &cells)?,
    };

    log::debug!(
        "Exported {} rows of {base} as {}",
        rows.len(),
        format.extension()
    );

    Ok(ExportFile {
        filename: export_filename(base, date, format),
        content_type: format.content_type(),
        bytes,
    })
}
