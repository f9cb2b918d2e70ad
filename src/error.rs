use thiserror::Error;

/// Boxed underlying cause carried by an [`ExtractorError`]
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used across the extraction library
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Classification of extraction failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The path or stream could not be opened
    Open,
    /// Reading the stream failed midway
    Read,
    /// Raw content exceeds `max_file_size`
    SizeLimitExceeded,
    /// Byte content could not be turned into text
    Encoding,
    /// Content is not a valid ZIP container
    InvalidContainer,
    /// The container has no matching XML part
    MissingPart,
    /// DOC/XLS/PPT binaries are never parsed
    UnsupportedLegacyFormat,
    /// Sniffing produced a MIME type with no extractor
    UnsupportedMimeType,
    /// Sniffing could not classify the file
    UnknownFileType,
    /// A delegated parsing library failed
    Library,
    /// A scratch file could not be created or written
    TempFile,
    /// The cooperative deadline expired
    Timeout,
}

/// Error produced by an extractor or by the factory.
///
/// Renders as `message` or `message: cause`, and exposes the cause through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{message}{}", cause_suffix(.source))]
pub struct ExtractorError {
    pub kind: ErrorKind,
    pub message: String,
    /// Type tag of the extractor that failed (`plaintext`, `docx`, ...)
    pub file_type: String,
    /// Operation tag (`read`, `size_check`, `open_zip`, ...)
    pub operation: String,
    #[source]
    pub source: Option<BoxedCause>,
}

fn cause_suffix(source: &Option<BoxedCause>) -> String {
    match source {
        Some(cause) => format!(": {}", cause),
        None => String::new(),
    }
}

impl ExtractorError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        file_type: &str,
        operation: &str,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            file_type: file_type.to_string(),
            operation: operation.to_string(),
            source: None,
        }
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        self.source = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub(crate) fn size_limit(file_type: &str, size: usize, limit: u64) -> Self {
        Self::new(
            ErrorKind::SizeLimitExceeded,
            format!("file size {} exceeds limit {}", size, limit),
            file_type,
            "size_check",
        )
    }
}
