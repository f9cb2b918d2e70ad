use crate::error::{ErrorKind, ExtractorError, Result};
use crate::extractor::r#trait::{read_content, TextExtractor};
use crate::extractor::types::scratch_file;
use crate::models::{Deadline, ExtractOptions, ExtractResult, Metadata};
use crate::utils;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use std::io::Read;

/// PDF handler backed by lopdf
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub const FILE_TYPE: &'static str = "pdf";

    pub fn new() -> Self {
        Self
    }

    /// Page walk over in-memory content; `deadline` is checked before each page
    pub(crate) fn extract_content(
        &self,
        content: &[u8],
        options: &ExtractOptions,
        deadline: &Deadline,
    ) -> Result<ExtractResult> {
        options.check_size(Self::FILE_TYPE, content.len())?;

        // lopdf is driven by path here; the scratch file is removed on drop
        let scratch = scratch_file(content, "pdf_extract_", ".pdf", Self::FILE_TYPE)?;
        let doc = Document::load(scratch.path()).map_err(|e| {
            ExtractorError::new(ErrorKind::Library, "failed to open PDF", Self::FILE_TYPE, "open")
                .with_source(e)
        })?;

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut page_texts = Vec::with_capacity(page_count);

        for (page_num, page_id) in pages {
            deadline.check(Self::FILE_TYPE, "page")?;

            if is_null_page(&doc, page_id) {
                log::warn!("skipping null PDF page {}", page_num);
                continue;
            }

            match Self::page_text(&doc, page_id) {
                Ok(text) => page_texts.push(text),
                Err(e) => log::warn!("skipping PDF page {}: {}", page_num, e),
            }
        }

        let mut text = page_texts.join("\n\n");
        if !options.preserve_formatting {
            text = utils::normalize_line_endings(&text);
        }

        let mut metadata = Metadata::new();
        metadata.insert("page_count".to_string(), page_count.into());
        metadata.insert("size_bytes".to_string(), content.len().into());
        metadata.insert("line_count".to_string(), utils::line_count(&text).into());
        metadata.insert("char_count".to_string(), utils::char_count(&text).into());
        metadata.insert(
            "word_count".to_string(),
            text.split_whitespace().count().into(),
        );

        Ok(ExtractResult::new(
            text,
            metadata,
            Self::FILE_TYPE,
            deadline.started(),
        ))
    }

    /// Concatenate the raw text fragments shown on one page.
    ///
    /// Fragments are joined with no inserted spacing; the content stream is
    /// trusted to carry its own inter-glyph spaces.
    ///
    /// A content reference that does not resolve to a stream fails the page.
    fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
        let mut data = Vec::new();
        for content_id in doc.get_page_contents(page_id) {
            let stream = doc.get_object(content_id).and_then(Object::as_stream)?;
            match stream.decompressed_content() {
                Ok(bytes) => data.extend_from_slice(&bytes),
                Err(_) => data.extend_from_slice(&stream.content),
            }
        }
        let content = Content::decode(&data)?;

        let mut text = String::new();
        for operation in &content.operations {
            match operation.operator.as_str() {
                "Tj" | "'" => {
                    if let Some(Object::String(bytes, _)) = operation.operands.last() {
                        text.push_str(&decode_pdf_string(bytes));
                    }
                }
                "\"" => {
                    if let Some(Object::String(bytes, _)) = operation.operands.get(2) {
                        text.push_str(&decode_pdf_string(bytes));
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operation.operands.first() {
                        for item in items {
                            if let Object::String(bytes, _) = item {
                                text.push_str(&decode_pdf_string(bytes));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }
}

/// Text strings are UTF-16BE when they start with a byte-order mark, otherwise one byte per glyph
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(body) => {
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn is_null_page(doc: &Document, page_id: ObjectId) -> bool {
    matches!(doc.get_object(page_id), Err(_) | Ok(Object::Null))
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        self.extract_content(&content, options, &deadline)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["pdf"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}
