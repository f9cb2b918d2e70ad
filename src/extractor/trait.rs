use crate::error::{ErrorKind, ExtractorError, Result};
use crate::models::{ExtractOptions, ExtractResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Uniform contract implemented by every format extractor.
///
/// Implementations hold no mutable state, so a single instance may be shared
/// across threads. Any future stateful variant needs its own locking.
pub trait TextExtractor: Send + Sync {
    /// Extract text and metadata from a byte stream
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult>;

    /// Extract text and metadata from a file path
    fn extract_from_file(&self, path: &Path, options: &ExtractOptions) -> Result<ExtractResult> {
        let mut file = open_file(path, self.file_type())?;
        self.extract(&mut file, options)
    }

    /// Extensions (without the dot) this extractor handles, in preference order
    fn supported_types(&self) -> &[&'static str];

    /// Tag reported in results and errors
    fn file_type(&self) -> &'static str;

    /// Check if this extractor supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.supported_types().iter().any(|t| *t == ext)
    }
}

pub(crate) fn open_file(path: &Path, file_type: &str) -> Result<File> {
    File::open(path).map_err(|e| {
        ExtractorError::new(
            ErrorKind::Open,
            format!("failed to open file {}", path.display()),
            file_type,
            "open",
        )
        .with_source(e)
    })
}

/// Read a whole stream into memory
pub(crate) fn read_content(reader: &mut dyn Read, file_type: &str) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content).map_err(|e| {
        ExtractorError::new(ErrorKind::Read, "failed to read content", file_type, "read")
            .with_source(e)
    })?;
    Ok(content)
}
