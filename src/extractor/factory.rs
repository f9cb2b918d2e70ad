use crate::error::{ErrorKind, ExtractorError, Result};
use crate::extractor::detect::{
    MagicSniffer, MimeSniffer, MIME_DOC, MIME_DOCX, MIME_PDF, MIME_PPT, MIME_PPTX, MIME_XLS,
    MIME_XLSX,
};
use crate::extractor::r#trait::TextExtractor;
use crate::extractor::types::{
    CsvExtractor, DocxExtractor, ImageExtractor, LegacyDocExtractor, LegacyPptExtractor,
    LegacyXlsExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, PptxExtractor,
    XlsxExtractor,
};
use std::path::Path;
use std::sync::Arc;

const TAG: &str = "factory";

type Constructor = fn() -> Arc<dyn TextExtractor>;

fn build<E: TextExtractor + Default + 'static>() -> Arc<dyn TextExtractor> {
    Arc::new(E::default())
}

/// Exact MIME type to extractor mapping. `text/*` is handled separately.
const MIME_TABLE: &[(&str, Constructor)] = &[
    (MIME_PDF, build::<PdfExtractor>),
    (MIME_DOCX, build::<DocxExtractor>),
    (MIME_XLSX, build::<XlsxExtractor>),
    (MIME_PPTX, build::<PptxExtractor>),
    (MIME_DOC, build::<LegacyDocExtractor>),
    (MIME_XLS, build::<LegacyXlsExtractor>),
    (MIME_PPT, build::<LegacyPptExtractor>),
];

/// Selects an extractor from file content.
///
/// CSV, Markdown and image files are never selected here: they sniff as
/// `text/*` or `image/*`. Build those with [`ExtractorFactory::for_format`].
pub struct ExtractorFactory {
    sniffer: Box<dyn MimeSniffer>,
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorFactory {
    pub fn new() -> Self {
        Self::with_sniffer(MagicSniffer::new())
    }

    pub fn with_sniffer<S: MimeSniffer + 'static>(sniffer: S) -> Self {
        Self {
            sniffer: Box::new(sniffer),
        }
    }

    /// Extractor for a MIME type, or None when no extractor handles it
    pub fn for_mime(mime: &str) -> Option<Arc<dyn TextExtractor>> {
        if let Some((_, constructor)) = MIME_TABLE.iter().find(|(m, _)| *m == mime) {
            return Some(constructor());
        }
        if mime.starts_with("text/") {
            return Some(Arc::new(PlainTextExtractor::new()));
        }
        None
    }

    /// Sniff the file content and pick the matching extractor
    pub fn create_extractor_from_path(&self, path: &Path) -> Result<Arc<dyn TextExtractor>> {
        let mime = self.sniffer.sniff(path)?.ok_or_else(|| {
            ExtractorError::new(
                ErrorKind::UnknownFileType,
                format!("unknown file type: {}", path.display()),
                TAG,
                "detect",
            )
        })?;

        let extractor = Self::for_mime(&mime).ok_or_else(|| {
            ExtractorError::new(
                ErrorKind::UnsupportedMimeType,
                format!("unsupported file type: {} for file {}", mime, path.display()),
                TAG,
                "dispatch",
            )
        })?;

        log::debug!(
            "{} detected as {}, using {} extractor",
            path.display(),
            mime,
            extractor.file_type()
        );
        Ok(extractor)
    }

    /// Extractor for an explicit format name, bypassing detection
    pub fn for_format(name: &str) -> Option<Arc<dyn TextExtractor>> {
        let extractor: Arc<dyn TextExtractor> = match name.to_lowercase().as_str() {
            "plaintext" | "text" | "txt" => Arc::new(PlainTextExtractor::new()),
            "csv" | "tsv" => Arc::new(CsvExtractor::new()),
            "markdown" | "md" => Arc::new(MarkdownExtractor::new()),
            "docx" => Arc::new(DocxExtractor::new()),
            "pptx" => Arc::new(PptxExtractor::new()),
            "xlsx" => Arc::new(XlsxExtractor::new()),
            "pdf" => Arc::new(PdfExtractor::new()),
            "image" => Arc::new(ImageExtractor::new()),
            "doc" => Arc::new(LegacyDocExtractor::new()),
            "xls" => Arc::new(LegacyXlsExtractor::new()),
            "ppt" => Arc::new(LegacyPptExtractor::new()),
            _ => return None,
        };
        Some(extractor)
    }
}
