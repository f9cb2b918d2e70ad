use crate::error::Result;
use crate::extractor::r#trait::{read_content, TextExtractor};
use crate::extractor::types::ooxml::{recover_slide_text, slide_part_pattern, OoxmlContainer};
use crate::extractor::types::PlainTextExtractor;
use crate::models::{Deadline, ExtractOptions, ExtractResult};
use crate::utils;
use std::io::Read;

/// Microsoft PowerPoint PPTX handler
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExtractor {
    base: PlainTextExtractor,
}

impl PptxExtractor {
    pub const FILE_TYPE: &'static str = "pptx";

    pub fn new() -> Self {
        Self {
            base: PlainTextExtractor::new(),
        }
    }

    /// Slide recovery over in-memory content; `deadline` is checked before each slide part
    pub(crate) fn extract_content(
        &self,
        content: &[u8],
        options: &ExtractOptions,
        deadline: &Deadline,
    ) -> Result<ExtractResult> {
        let mut result =
            self.base
                .extract_bytes(content, options, deadline.started(), Self::FILE_TYPE)?;

        let mut container = OoxmlContainer::open(content, Self::FILE_TYPE)?;
        // Slides come back in archive directory order, not numeric order
        let slides = container.read_matching_parts(slide_part_pattern(), deadline)?;
        let slide_count = slides.len();

        let blocks: Vec<String> = slides
            .iter()
            .map(|(name, xml)| {
                let text = recover_slide_text(xml);
                log::debug!("{}: {} bytes of text", name, text.len());
                text
            })
            .filter(|text| !text.is_empty())
            .collect();
        let text = blocks.join("\n\n");

        let char_count = utils::char_count(&text);
        result.set_meta("slides", slide_count);
        result.set_meta("characters", char_count);
        result.set_meta("char_count", char_count);
        result.set_meta("line_count", utils::line_count(&text));
        result.text = text;
        result.file_type = Self::FILE_TYPE.to_string();
        result.processing_time = deadline.started().elapsed();

        Ok(result)
    }
}

impl TextExtractor for PptxExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        self.extract_content(&content, options, &deadline)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["pptx"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}
