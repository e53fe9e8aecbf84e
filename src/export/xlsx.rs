use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::export::{ExportError, ExportResult};

impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        ExportError::Xlsx(err.to_string())
    }
}

/// Sheet names are limited to 31 characters and a few forbidden symbols.
fn sheet_name(base: &str) -> String {
    let name: String = base
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if name.trim().is_empty() {
        "Export".to_string()
    } else {
        name
    }
}

pub(super) fn render(base: &str, headers: &[&str], rows: &[Vec<String>]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(base))?;

    for (col, header) in headers.iter().enumerate() {
        let col = u16::try_from(col).map_err(|e| ExportError::Xlsx(e.to_string()))?;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, 18)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = u32::try_from(index + 1).map_err(|e| ExportError::Xlsx(e.to_string()))?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).map_err(|e| ExportError::Xlsx(e.to_string()))?;
            worksheet.write_string(line, col, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
