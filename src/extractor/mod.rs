pub mod detect;
pub mod factory;
pub mod r#trait;
pub mod types;

pub use detect::{MagicSniffer, MimeSniffer};
pub use factory::ExtractorFactory;
pub use r#trait::TextExtractor;
pub use types::{
    CsvExtractor, DocxExtractor, ImageExtractor, LegacyDocExtractor, LegacyPptExtractor,
    LegacyXlsExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, PptxExtractor,
    XlsxExtractor,
};
