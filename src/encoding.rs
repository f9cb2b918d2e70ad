//! Byte-to-text normalization.
//!
//! Content that is already UTF-8 passes through untouched. Anything else is
//! tried against a fixed, ordered list of legacy encodings (Unicode transports
//! before single-byte code pages, Western before Cyrillic) and finally forced
//! into UTF-8 with replacement characters. The chain never fails.
//!
//! UTF-16 is only tried behind a byte-order mark; content without one is never
//! decoded as UTF-16 by declared byte order.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, WINDOWS_1251, WINDOWS_1252};
use std::borrow::Cow;

/// Label reported for content that was already valid UTF-8
pub const UTF8_LABEL: &str = "UTF-8";

/// Label reported when no candidate decoded cleanly
pub const REPLACEMENT_LABEL: &str = "UTF-8 (with replacements)";

#[derive(Debug, Clone, Copy)]
enum Decoder {
    /// Applies only when the content starts with the matching byte-order mark
    Utf16 {
        encoding: &'static Encoding,
        bom: [u8; 2],
    },
    SingleByte(&'static Encoding),
    /// encoding_rs folds ISO-8859-1 into windows-1252, so this maps bytes to code points directly
    Latin1,
}

/// One entry of the fallback chain
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub label: &'static str,
    decoder: Decoder,
}

impl Candidate {
    /// Decode `bytes`, returning `None` if any sequence is malformed
    fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self.decoder {
            Decoder::Utf16 { encoding, bom } => {
                let body = bytes.strip_prefix(&bom[..])?;
                encoding.decode_without_bom_handling_and_without_replacement(body)
            }
            Decoder::SingleByte(encoding) => {
                encoding.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Decoder::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
        }
    }
}

/// The ordered candidate list used by [`normalize`]
pub fn default_candidates() -> [Candidate; 5] {
    [
        Candidate {
            label: "UTF-16LE",
            decoder: Decoder::Utf16 {
                encoding: UTF_16LE,
                bom: [0xFF, 0xFE],
            },
        },
        Candidate {
            label: "UTF-16BE",
            decoder: Decoder::Utf16 {
                encoding: UTF_16BE,
                bom: [0xFE, 0xFF],
            },
        },
        Candidate {
            label: "Windows-1252",
            decoder: Decoder::SingleByte(WINDOWS_1252),
        },
        Candidate {
            label: "ISO-8859-1",
            decoder: Decoder::Latin1,
        },
        Candidate {
            label: "Windows-1251",
            decoder: Decoder::SingleByte(WINDOWS_1251),
        },
    ]
}

/// Convert raw bytes to text, returning the text and the label of the encoding used
pub fn normalize(bytes: &[u8]) -> (String, &'static str) {
    normalize_with(bytes, &default_candidates())
}

/// [`normalize`] with an explicit candidate list
pub fn normalize_with(bytes: &[u8], candidates: &[Candidate]) -> (String, &'static str) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), UTF8_LABEL);
    }

    for candidate in candidates {
        if let Some(text) = candidate.decode(bytes) {
            log::debug!("decoded content as {}", candidate.label);
            return (text.into_owned(), candidate.label);
        }
    }

    (
        String::from_utf8_lossy(bytes).into_owned(),
        REPLACEMENT_LABEL,
    )
}
