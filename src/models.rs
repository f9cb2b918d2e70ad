use crate::error::{ErrorKind, ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Metadata bag attached to every successful extraction
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Default size limit applied by [`ExtractOptions::default`] (100MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default extraction deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call extraction options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Format hint; the image extractor also reads it for the "sample" affordance
    #[serde(default)]
    pub file_type: String,
    /// Reserved for OCR, which is not implemented
    #[serde(default)]
    pub ocr_language: String,
    /// Maximum raw content size in bytes (0 = unlimited)
    #[serde(default)]
    pub max_file_size: u64,
    /// Cooperative deadline for the whole call (None = no deadline)
    #[serde(default)]
    pub timeout: Option<Duration>,
    /// When false, line endings are normalized and Markdown syntax is stripped
    #[serde(default)]
    pub preserve_formatting: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            file_type: String::new(),
            ocr_language: "eng".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            timeout: Some(DEFAULT_TIMEOUT),
            preserve_formatting: false,
        }
    }
}

impl ExtractOptions {
    /// Fail with a size-limit error if `len` exceeds `max_file_size`
    pub(crate) fn check_size(&self, file_type: &str, len: usize) -> Result<()> {
        if self.max_file_size > 0 && len as u64 > self.max_file_size {
            return Err(ExtractorError::size_limit(file_type, len, self.max_file_size));
        }
        Ok(())
    }
}

/// Outcome of a successful extraction
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResult {
    /// Recovered text
    pub text: String,
    /// Counts, formats and flags; keys vary per extractor
    pub metadata: Metadata,
    /// Tag of the extractor that produced the result
    pub file_type: String,
    /// Wall-clock duration of the call
    pub processing_time: Duration,
}

impl ExtractResult {
    pub fn new(text: String, metadata: Metadata, file_type: &str, started: Instant) -> Self {
        Self {
            text,
            metadata,
            file_type: file_type.to_string(),
            processing_time: started.elapsed(),
        }
    }

    /// Insert or overwrite a metadata entry
    pub fn set_meta(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }
}

/// Cooperative cancellation point derived from [`ExtractOptions::timeout`].
///
/// Extractors call [`Deadline::check`] at stream-read and per-part boundaries;
/// a single long library call is never interrupted.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn start(options: &ExtractOptions) -> Self {
        let started = Instant::now();
        Self {
            started,
            expires_at: options.timeout.map(|t| started + t),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn check(&self, file_type: &str, operation: &str) -> Result<()> {
        match self.expires_at {
            Some(at) if Instant::now() >= at => Err(ExtractorError::new(
                ErrorKind::Timeout,
                format!(
                    "extraction exceeded timeout after {:?}",
                    self.started.elapsed()
                ),
                file_type,
                operation,
            )),
            _ => Ok(()),
        }
    }
}
