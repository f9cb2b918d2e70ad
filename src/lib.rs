pub mod config;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod models;
pub mod utils;

pub use config::Config;
pub use error::{ErrorKind, ExtractorError, Result};
pub use extractor::{ExtractorFactory, TextExtractor};
pub use models::{ExtractOptions, ExtractResult, Metadata};
