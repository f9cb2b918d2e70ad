use crate::error::Result;
use crate::extractor::r#trait::{read_content, TextExtractor};
use crate::extractor::types::ooxml::{recover_document_text, OoxmlContainer};
use crate::extractor::types::PlainTextExtractor;
use crate::models::{Deadline, ExtractOptions, ExtractResult};
use crate::utils;
use std::io::Read;

/// Main document body inside a DOCX container
const DOCUMENT_PART: &str = "word/document.xml";

/// Microsoft Word DOCX handler
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor {
    base: PlainTextExtractor,
}

impl DocxExtractor {
    pub const FILE_TYPE: &'static str = "docx";

    pub fn new() -> Self {
        Self {
            base: PlainTextExtractor::new(),
        }
    }

    /// Recover the document body from content that has already been read
    pub(crate) fn extract_content(
        &self,
        content: &[u8],
        options: &ExtractOptions,
        deadline: &Deadline,
    ) -> Result<ExtractResult> {
        // Size check and size/encoding metadata come from the plain text pass
        let mut result =
            self.base
                .extract_bytes(content, options, deadline.started(), Self::FILE_TYPE)?;

        let mut container = OoxmlContainer::open(content, Self::FILE_TYPE)?;
        let xml = container.read_part(DOCUMENT_PART)?;
        deadline.check(Self::FILE_TYPE, "scan_document")?;

        let text = recover_document_text(&xml);
        log::debug!("recovered {} bytes of DOCX text", text.len());

        let line_count = utils::line_count(&text);
        let char_count = utils::char_count(&text);
        result.text = text;
        result.file_type = Self::FILE_TYPE.to_string();
        result.set_meta("paragraphs", line_count);
        // Tables are never detected
        result.set_meta("table_count", 0);
        result.set_meta("characters", char_count);
        result.set_meta("char_count", char_count);
        result.set_meta("line_count", line_count);
        result.processing_time = deadline.started().elapsed();

        Ok(result)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        self.extract_content(&content, options, &deadline)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["docx"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}
