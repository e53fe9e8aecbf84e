use ::csv::WriterBuilder;

use crate::export::ExportResult;

/// Semicolon-separated, UTF-8 with BOM so spreadsheet tools pick the encoding.
pub(super) fn render(headers: &[&str], rows: &[Vec<String>]) -> ExportResult<Vec<u8>> {
    let mut buffer = "\u{feff}".as_bytes().to_vec();
    {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .from_writer(&mut buffer);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_fields_with_separators_and_newlines() {
        let bytes = render(
            &["Nom", "Commentaire"],
            &[vec!["A".into(), "ligne 1\nligne 2".into()]],
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "\u{feff}Nom;Commentaire\nA;\"ligne 1\nligne 2\"\n");
    }
}
