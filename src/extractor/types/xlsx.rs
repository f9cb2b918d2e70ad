use crate::error::{ErrorKind, ExtractorError, Result};
use crate::extractor::r#trait::{read_content, TextExtractor};
use crate::extractor::types::{scratch_file, PlainTextExtractor};
use crate::models::{Deadline, ExtractOptions, ExtractResult};
use crate::utils;
use calamine::{open_workbook, Reader, Xlsx};
use std::io::Read;

/// Microsoft Excel XLSX handler backed by calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExtractor {
    base: PlainTextExtractor,
}

impl XlsxExtractor {
    pub const FILE_TYPE: &'static str = "xlsx";

    pub fn new() -> Self {
        Self {
            base: PlainTextExtractor::new(),
        }
    }

    /// Workbook flattening over in-memory content; `deadline` is checked before each sheet
    pub(crate) fn extract_content(
        &self,
        content: &[u8],
        options: &ExtractOptions,
        deadline: &Deadline,
    ) -> Result<ExtractResult> {
        let mut result =
            self.base
                .extract_bytes(content, options, deadline.started(), Self::FILE_TYPE)?;

        // calamine opens workbooks by path; the scratch file is removed on drop
        let scratch = scratch_file(content, "xlsx_temp_", ".xlsx", Self::FILE_TYPE)?;
        let mut workbook: Xlsx<_> = open_workbook(scratch.path())
            .map_err(|e| library_error("failed to parse XLSX file", "open", e))?;

        // Cells are concatenated with no separator between cells, rows or sheets
        let mut text = String::new();
        let mut stats = SheetStats::default();

        for name in workbook.sheet_names() {
            deadline.check(Self::FILE_TYPE, "sheet")?;
            stats.sheets += 1;

            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| library_error("failed to read worksheet", "sheet", e))?;

            for row in range.rows() {
                stats.rows += 1;
                for cell in row {
                    stats.cells += 1;
                    let cell_text = cell.to_string();
                    let cell_text = cell_text.trim();
                    if !cell_text.is_empty() {
                        text.push_str(cell_text);
                    }
                }
            }
        }
        log::debug!(
            "read {} sheets, {} rows, {} cells",
            stats.sheets,
            stats.rows,
            stats.cells
        );

        if !options.preserve_formatting {
            text = utils::normalize_line_endings(&text);
        }

        let char_count = utils::char_count(&text);
        result.set_meta("sheets", stats.sheets);
        result.set_meta("rows", stats.rows);
        result.set_meta("cells", stats.cells);
        result.set_meta("character_count", char_count);
        result.set_meta("char_count", char_count);
        result.set_meta("line_count", utils::line_count(&text));
        result.text = text;
        result.file_type = Self::FILE_TYPE.to_string();
        result.processing_time = deadline.started().elapsed();

        Ok(result)
    }
}

#[derive(Debug, Default)]
struct SheetStats {
    sheets: usize,
    rows: usize,
    cells: usize,
}

fn library_error(message: &str, operation: &str, cause: calamine::XlsxError) -> ExtractorError {
    ExtractorError::new(ErrorKind::Library, message, XlsxExtractor::FILE_TYPE, operation)
        .with_source(cause)
}

impl TextExtractor for XlsxExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        self.extract_content(&content, options, &deadline)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["xlsx"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::extractor::types::ooxml::fixtures::zip_bytes;

    pub enum Cell<'a> {
        Text(&'a str),
        Number(f64),
    }

    fn column(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    fn sheet_xml(rows: &[Vec<Cell>]) -> String {
        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column(c), r + 1);
                match cell {
                    Cell::Text(t) => data.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference, t
                    )),
                    Cell::Number(n) => {
                        data.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n))
                    }
                }
            }
            data.push_str("</row>");
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            data
        )
    }

    /// Minimal workbook with one worksheet part per `(name, rows)` entry
    pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
        let mut sheet_entries = String::new();
        let mut rels = String::new();
        let mut overrides = String::new();
        let mut parts = Vec::new();

        for (i, (name, rows)) in sheets.iter().enumerate() {
            let id = i + 1;
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                name, id, id
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                id, id
            ));
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                id
            ));
            parts.push((format!("xl/worksheets/sheet{}.xml", id), sheet_xml(rows)));
        }

        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
            overrides
        );
        let root_rels = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
        let workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheet_entries
        );
        let workbook_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        );

        let mut entries: Vec<(&str, &str)> = vec![
            ("[Content_Types].xml", content_types.as_str()),
            ("_rels/.rels", root_rels),
            ("xl/workbook.xml", workbook.as_str()),
            ("xl/_rels/workbook.xml.rels", workbook_rels.as_str()),
        ];
        for (name, xml) in &parts {
            entries.push((name.as_str(), xml.as_str()));
        }
        zip_bytes(&entries)
    }
}
