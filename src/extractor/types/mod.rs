pub mod csv;
pub mod docx;
pub mod image;
pub mod legacy;
pub mod md;
pub(crate) mod ooxml;
pub mod pdf;
pub mod plaintext;
pub mod pptx;
pub mod xlsx;

pub use self::csv::CsvExtractor;
pub use self::image::ImageExtractor;
pub use docx::DocxExtractor;
pub use legacy::{LegacyDocExtractor, LegacyPptExtractor, LegacyXlsExtractor};
pub use md::MarkdownExtractor;
pub use pdf::PdfExtractor;
pub use plaintext::PlainTextExtractor;
pub use pptx::PptxExtractor;
pub use xlsx::XlsxExtractor;

use crate::error::{ErrorKind, ExtractorError, Result};
use std::io::Write;
use tempfile::NamedTempFile;

/// Copy content into a named temporary file for libraries that only open paths
pub(crate) fn scratch_file(
    content: &[u8],
    prefix: &str,
    suffix: &str,
    file_type: &str,
) -> Result<NamedTempFile> {
    let temp_error = |message: &str, e: std::io::Error| {
        ExtractorError::new(ErrorKind::TempFile, message, file_type, "temp_file").with_source(e)
    };

    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .map_err(|e| temp_error("failed to create temp file", e))?;
    file.write_all(content)
        .and_then(|_| file.flush())
        .map_err(|e| temp_error("failed to write temp file", e))?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_file() {
        let file = scratch_file(b"payload", "unit_", ".bin", "pdf").unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("unit_"));
        assert!(name.ends_with(".bin"));
        assert_eq!(std::fs::read(file.path()).unwrap(), b"payload");
    }

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let file = scratch_file(b"x", "unit_", ".bin", "xlsx").unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
    }
}
