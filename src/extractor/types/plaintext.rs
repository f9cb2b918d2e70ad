use crate::encoding;
use crate::error::Result;
use crate::extractor::r#trait::{read_content, TextExtractor};
use crate::models::{Deadline, ExtractOptions, ExtractResult, Metadata};
use crate::utils;
use std::io::Read;
use std::time::Instant;

/// Plain text handler, also the shared base for the structured formats
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub const FILE_TYPE: &'static str = "plaintext";

    pub fn new() -> Self {
        Self
    }

    /// Run the plain text pipeline over content that is already in memory.
    ///
    /// The size limit is enforced on the raw bytes before any decoding. Errors
    /// carry `file_type` so wrapping extractors report under their own tag.
    pub(crate) fn extract_bytes(
        &self,
        content: &[u8],
        options: &ExtractOptions,
        started: Instant,
        file_type: &str,
    ) -> Result<ExtractResult> {
        options.check_size(file_type, content.len())?;

        let (mut text, encoding) = encoding::normalize(content);

        if !options.preserve_formatting {
            text = utils::normalize_line_endings(&text);
        }

        let mut metadata = Metadata::new();
        metadata.insert("encoding".to_string(), encoding.into());
        metadata.insert("size_bytes".to_string(), content.len().into());
        metadata.insert("line_count".to_string(), utils::line_count(&text).into());
        metadata.insert("char_count".to_string(), utils::char_count(&text).into());

        Ok(ExtractResult::new(text, metadata, Self::FILE_TYPE, started))
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        self.extract_bytes(&content, options, deadline.started(), Self::FILE_TYPE)
    }

    fn supported_types(&self) -> &[&'static str] {
        &[
            "txt", "csv", "yaml", "yml", "json", "xml", "md", "markdown", "log", "conf", "cfg",
            "ini",
        ]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn extract(content: &[u8], options: &ExtractOptions) -> Result<ExtractResult> {
        PlainTextExtractor::new().extract(&mut Cursor::new(content.to_vec()), options)
    }

    #[test]
    fn test_plaintext_extraction() {
        let result = extract(b"Hello\nWorld", &ExtractOptions::default()).unwrap();

        assert_eq!(result.text, "Hello\nWorld");
        assert_eq!(result.file_type, "plaintext");
        assert_eq!(result.metadata["encoding"], "UTF-8");
        assert_eq!(result.metadata["size_bytes"], 11);
        assert_eq!(result.metadata["line_count"], 2);
        assert_eq!(result.metadata["char_count"], 11);
    }

    #[test]
    fn test_line_endings_normalized() {
        let result = extract(b"a\r\nb\rc", &ExtractOptions::default()).unwrap();
        assert_eq!(result.text, "a\nb\nc");
        assert_eq!(result.metadata["line_count"], 3);
    }

    #[test]
    fn test_line_endings_preserved() {
        let options = ExtractOptions {
            preserve_formatting: true,
            ..Default::default()
        };
        let result = extract(b"a\r\nb", &options).unwrap();
        assert_eq!(result.text, "a\r\nb");
    }

    #[test]
    fn test_char_count_by_code_point() {
        let result = extract("naïve".as_bytes(), &ExtractOptions::default()).unwrap();
        assert_eq!(result.metadata["char_count"], 5);
        assert_eq!(result.metadata["size_bytes"], 6);
    }

    #[test]
    fn test_legacy_encoding_detected() {
        let result = extract(b"r\xe9sum\xe9", &ExtractOptions::default()).unwrap();
        assert_eq!(result.text, "résumé");
        assert_eq!(result.metadata["encoding"], "Windows-1252");
    }

    #[test]
    fn test_size_limit_exceeded() {
        let options = ExtractOptions {
            max_file_size: 1,
            ..Default::default()
        };
        let err = extract(b"more than one byte", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeLimitExceeded);
        assert_eq!(err.file_type, "plaintext");
    }

    #[test]
    fn test_timeout_checked_after_read() {
        let options = ExtractOptions {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        let err = extract(b"text", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_extract_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "line one\nline two\n").unwrap();

        let result = PlainTextExtractor::new()
            .extract_from_file(temp_file.path(), &ExtractOptions::default())
            .unwrap();
        assert_eq!(result.text, "line one\nline two\n");
        assert_eq!(result.metadata["line_count"], 3);
    }

    #[test]
    fn test_supported_types() {
        let extractor = PlainTextExtractor::new();
        assert_eq!(extractor.supported_types().len(), 12);
        assert!(extractor.supports_extension("TXT"));
        assert!(extractor.supports_extension("ini"));
        assert!(!extractor.supports_extension("pdf"));
    }
}
