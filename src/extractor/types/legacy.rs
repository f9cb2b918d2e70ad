use crate::error::{ErrorKind, ExtractorError, Result};
use crate::extractor::r#trait::TextExtractor;
use crate::models::{ExtractOptions, ExtractResult};
use crate::utils;
use std::io::Read;
use std::path::Path;

fn unsupported(legacy: &str, modern: &str, operation: &str, detail: String) -> ExtractorError {
    ExtractorError::new(
        ErrorKind::UnsupportedLegacyFormat,
        format!(
            "legacy {} format is not supported: {}. Please convert to {} format for text extraction",
            legacy, detail, modern
        ),
        &legacy.to_lowercase(),
        operation,
    )
}

macro_rules! legacy_extractor {
    ($(#[$doc:meta])* $name:ident, $legacy:literal, $modern:literal, $ext:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub const FILE_TYPE: &'static str = $ext;

            pub fn new() -> Self {
                Self
            }
        }

        impl TextExtractor for $name {
            fn extract(
                &self,
                _reader: &mut dyn Read,
                _options: &ExtractOptions,
            ) -> Result<ExtractResult> {
                Err(unsupported(
                    $legacy,
                    $modern,
                    "extract",
                    format!(
                        "{} files use a proprietary binary format that requires specialized libraries",
                        $legacy
                    ),
                ))
            }

            // Never opens the file
            fn extract_from_file(
                &self,
                path: &Path,
                _options: &ExtractOptions,
            ) -> Result<ExtractResult> {
                Err(unsupported(
                    $legacy,
                    $modern,
                    "extract_from_file",
                    format!("{} uses a proprietary binary format", utils::file_name(path)),
                ))
            }

            fn supported_types(&self) -> &[&'static str] {
                &[$ext]
            }

            fn file_type(&self) -> &'static str {
                Self::FILE_TYPE
            }
        }
    };
}

legacy_extractor!(
    /// Word 97-2003 binary documents
    LegacyDocExtractor, "DOC", "DOCX", "doc"
);
legacy_extractor!(
    /// Excel 97-2003 binary workbooks
    LegacyXlsExtractor, "XLS", "XLSX", "xls"
);
legacy_extractor!(
    /// PowerPoint 97-2003 binary presentations
    LegacyPptExtractor, "PPT", "PPTX", "ppt"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_legacy_doc_extract_fails() {
        let err = LegacyDocExtractor::new()
            .extract(&mut Cursor::new(b"\xD0\xCF\x11\xE0".to_vec()), &ExtractOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLegacyFormat);
        assert_eq!(err.file_type, "doc");
        assert_eq!(
            err.to_string(),
            "legacy DOC format is not supported: DOC files use a proprietary binary format \
             that requires specialized libraries. Please convert to DOCX format for text extraction"
        );
    }

    #[test]
    fn test_legacy_extract_from_file_names_file_without_opening() {
        // The path does not exist; an open attempt would surface as ErrorKind::Open
        let err = LegacyXlsExtractor::new()
            .extract_from_file(Path::new("/no/such/dir/budget.xls"), &ExtractOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedLegacyFormat);
        assert_eq!(
            err.to_string(),
            "legacy XLS format is not supported: budget.xls uses a proprietary binary format. \
             Please convert to XLSX format for text extraction"
        );
    }

    #[test]
    fn test_legacy_ppt_names_modern_equivalent() {
        let err = LegacyPptExtractor::new()
            .extract(&mut Cursor::new(Vec::new()), &ExtractOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Please convert to PPTX format"));
        assert_eq!(LegacyPptExtractor::new().supported_types(), &["ppt"]);
    }
}
