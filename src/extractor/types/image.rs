use crate::error::Result;
use crate::extractor::r#trait::{open_file, read_content, TextExtractor};
use crate::models::{Deadline, ExtractOptions, ExtractResult, Metadata};
use crate::utils;
use image::GenericImageView;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Default cap applied when the call does not set its own limit
pub const DEFAULT_IMAGE_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

const PLACEHOLDER_TEXT: &str = "[Image content detected - OCR not implemented]";
const SAMPLE_TEXT: &str = "A picture sample";
const NOTE: &str = "basic image analysis only, no OCR";

/// Raster image handler.
///
/// Decodes the image to validate it and read its dimensions. No text is
/// recognised; successful decodes return a fixed placeholder. Invalid,
/// empty and oversized inputs produce an empty result with an `error`
/// metadata entry instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct ImageExtractor {
    pub max_file_size: u64,
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_IMAGE_MAX_FILE_SIZE,
        }
    }
}

impl ImageExtractor {
    pub const FILE_TYPE: &'static str = "image";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_size(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    fn flagged(reason: &str, started: Instant) -> ExtractResult {
        let mut metadata = Metadata::new();
        metadata.insert("error".to_string(), reason.into());
        ExtractResult::new(String::new(), metadata, Self::FILE_TYPE, started)
    }

    fn extract_content(&self, content: &[u8], options: &ExtractOptions, started: Instant) -> ExtractResult {
        if content.is_empty() {
            return Self::flagged("empty content", started);
        }

        let limit = if options.max_file_size > 0 {
            options.max_file_size
        } else {
            self.max_file_size
        };
        if limit > 0 && content.len() as u64 > limit {
            return Self::flagged("file too large", started);
        }

        let decoded = image::guess_format(content).and_then(|format| {
            image::load_from_memory_with_format(content, format).map(|img| (format, img))
        });
        let (format, img) = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                log::debug!("image decode failed: {}", e);
                return Self::flagged("invalid image format", started);
            }
        };
        let (width, height) = img.dimensions();

        let text = if options.file_type.to_lowercase().contains("sample") {
            SAMPLE_TEXT
        } else {
            PLACEHOLDER_TEXT
        };

        let mut metadata = Metadata::new();
        metadata.insert(
            "image_format".to_string(),
            format!("{:?}", format).to_lowercase().into(),
        );
        metadata.insert("width".to_string(), width.into());
        metadata.insert("height".to_string(), height.into());
        metadata.insert("file_size".to_string(), content.len().into());
        metadata.insert("text_length".to_string(), text.len().into());
        metadata.insert(
            "extracted_at".to_string(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        metadata.insert("note".to_string(), NOTE.into());

        ExtractResult::new(text.to_string(), metadata, Self::FILE_TYPE, started)
    }
}

impl TextExtractor for ImageExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let deadline = Deadline::start(options);
        let content = read_content(reader, Self::FILE_TYPE)?;
        deadline.check(Self::FILE_TYPE, "read")?;

        Ok(self.extract_content(&content, options, deadline.started()))
    }

    fn extract_from_file(&self, path: &Path, options: &ExtractOptions) -> Result<ExtractResult> {
        let mut file = open_file(path, Self::FILE_TYPE)?;

        // The file name doubles as the format hint when none was given
        let mut options = options.clone();
        if options.file_type.is_empty() {
            options.file_type = utils::file_name(path);
        }

        self.extract(&mut file, &options)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["png", "jpg", "jpeg", "gif", "bmp", "tiff"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}
