use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::export::{ExportError, ExportResult};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const LINE_HEIGHT: f32 = 6.0;
const TITLE_SIZE: f32 = 13.0;
const FONT_SIZE: f32 = 8.0;

fn pdf_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

/// Cuts a cell so it fits its column; builtin fonts have no text wrapping.
fn fit(cell: &str, max_chars: usize) -> String {
    let single_line = cell.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

fn write_line(cursor: &Cursor, cells: &[String], column_width: f32, max_chars: usize, font: &IndirectFontRef) {
    for (index, cell) in cells.iter().enumerate() {
        let x = MARGIN + column_width * index as f32;
        cursor
            .layer
            .use_text(fit(cell, max_chars), FONT_SIZE, Mm(x), Mm(cursor.y), font);
    }
}

/// Landscape A4 table; the header row is repeated on every page.
pub(super) fn render(title: &str, headers: &[&str], rows: &[Vec<String>]) -> ExportResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Tableau");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let column_count = headers.len().max(1);
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / column_count as f32;
    let max_chars = ((column_width / 1.7) as usize).max(4);
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
    };
    cursor
        .layer
        .use_text(title, TITLE_SIZE, Mm(MARGIN), Mm(cursor.y), &bold);
    cursor.y -= LINE_HEIGHT * 1.5;
    write_line(&cursor, &header_cells, column_width, max_chars, &bold);
    cursor.y -= LINE_HEIGHT;

    for row in rows {
        if cursor.y < MARGIN {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Tableau");
            cursor = Cursor {
                layer: doc.get_page(next_page).get_layer(next_layer),
                y: PAGE_HEIGHT - MARGIN,
            };
            write_line(&cursor, &header_cells, column_width, max_chars, &bold);
            cursor.y -= LINE_HEIGHT;
        }
        write_line(&cursor, row, column_width, max_chars, &regular);
        cursor.y -= LINE_HEIGHT;
    }

    drop(cursor);
    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_truncates_long_cells() {
        assert_eq!(fit("court", 10), "court");
        assert_eq!(fit("abcdefghij", 5), "abcd…");
        assert_eq!(fit("a\nb", 10), "a b");
    }
}
