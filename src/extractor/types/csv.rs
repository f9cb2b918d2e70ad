use crate::error::Result;
use crate::extractor::r#trait::TextExtractor;
use crate::extractor::types::PlainTextExtractor;
use crate::models::{ExtractOptions, ExtractResult};
use std::io::Read;

/// CSV handler layered on the plain text pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExtractor {
    base: PlainTextExtractor,
}

impl CsvExtractor {
    pub const FILE_TYPE: &'static str = "csv";

    pub fn new() -> Self {
        Self {
            base: PlainTextExtractor::new(),
        }
    }

    /// Heuristic: the first row is a header if it has fewer numeric-looking
    /// fields than the second row
    fn detect_header(lines: &[&str]) -> bool {
        if lines.len() < 2 {
            return false;
        }
        count_numbers(lines[0]) < count_numbers(lines[1])
    }

    /// Number of data records, read with the csv crate over the normalized text.
    /// Counting stops at the first malformed record, so a broken row truncates `row_count`.
    fn count_records(text: &str, has_header: bool) -> usize {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut row_count = 0;
        for record in rdr.records() {
            match record {
                Ok(_) => row_count += 1,
                Err(e) => {
                    log::debug!("stopped counting CSV rows at {}: {}", row_count, e);
                    break;
                }
            }
        }
        row_count
    }
}

/// Count fields in a row that contain at least one digit
fn count_numbers(row: &str) -> usize {
    row.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty() && field.chars().any(|c| c.is_ascii_digit()))
        .count()
}

impl TextExtractor for CsvExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let mut result = self.base.extract(reader, options)?;

        let lines: Vec<&str> = result.text.split('\n').collect();
        let column_count = lines[0].matches(',').count() + 1;
        let has_header = Self::detect_header(&lines);
        let row_count = Self::count_records(&result.text, has_header);

        result.set_meta("column_count", column_count);
        result.set_meta("has_header", has_header);
        result.set_meta("row_count", row_count);
        result.file_type = Self::FILE_TYPE.to_string();

        Ok(result)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["csv", "tsv"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}
