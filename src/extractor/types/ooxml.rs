//! Text recovery shared by the Office Open XML extractors.
//!
//! DOCX and PPTX files are ZIP containers holding XML parts. Text is
//! recovered with a two-stage pattern scan (structural boundary, then text
//! runs) rather than an XML document model. Known unsupported shapes, kept
//! as-is for output compatibility:
//!
//! - a paragraph whose markup spans a line break is not matched (`.` does
//!   not cross newlines)
//! - self-closing or nested run elements
//! - attribute values containing `>` inside a run's start tag
//! - XML entities are not decoded (`&amp;` stays `&amp;`)

use crate::error::{ErrorKind, ExtractorError, Result};
use crate::models::Deadline;
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

lazy_static! {
    static ref PARAGRAPH_RE: Regex = Regex::new(r"<w:p[^>]*>(.*?)</w:p>").unwrap();
    static ref WORD_RUN_RE: Regex = Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").unwrap();
    static ref SLIDE_RUN_RE: Regex = Regex::new(r"<a:t[^>]*>([^<]*)</a:t>").unwrap();
    static ref SLIDE_PART_RE: Regex = Regex::new(r"^ppt/slides/slide\d+\.xml$").unwrap();
}

/// An opened OOXML ZIP container
pub(crate) struct OoxmlContainer<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    file_type: &'static str,
}

impl<'a> OoxmlContainer<'a> {
    pub fn open(content: &'a [u8], file_type: &'static str) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(content)).map_err(|e| {
            ExtractorError::new(
                ErrorKind::InvalidContainer,
                format!("failed to read {} as zip", file_type.to_uppercase()),
                file_type,
                "open_zip",
            )
            .with_source(e)
        })?;
        Ok(Self { archive, file_type })
    }

    /// Read the part stored at exactly `name`
    pub fn read_part(&mut self, name: &str) -> Result<String> {
        let file_type = self.file_type;
        let part = match self.archive.by_name(name) {
            Ok(part) => part,
            Err(ZipError::FileNotFound) => {
                return Err(ExtractorError::new(
                    ErrorKind::MissingPart,
                    format!("{} not found in {} file", name, file_type.to_uppercase()),
                    file_type,
                    "find_part",
                ))
            }
            Err(e) => {
                return Err(ExtractorError::new(
                    ErrorKind::InvalidContainer,
                    format!("failed to open {}", name),
                    file_type,
                    "open_part",
                )
                .with_source(e))
            }
        };
        read_xml(part, name, file_type)
    }

    /// Read every part whose name matches `pattern`, in archive directory order
    pub fn read_matching_parts(
        &mut self,
        pattern: &Regex,
        deadline: &Deadline,
    ) -> Result<Vec<(String, String)>> {
        let file_type = self.file_type;
        let mut parts = Vec::new();

        for i in 0..self.archive.len() {
            // Raw access reads the name without decrypting or decompressing
            let name = self
                .archive
                .by_index_raw(i)
                .map(|entry| entry.name().to_string())
                .map_err(|e| entry_error(i, file_type, e))?;
            if !pattern.is_match(&name) {
                continue;
            }

            deadline.check(file_type, "read_part")?;
            let part = self
                .archive
                .by_index(i)
                .map_err(|e| entry_error(i, file_type, e))?;
            let xml = read_xml(part, &name, file_type)?;
            parts.push((name, xml));
        }

        Ok(parts)
    }
}

fn entry_error(index: usize, file_type: &str, cause: ZipError) -> ExtractorError {
    ExtractorError::new(
        ErrorKind::InvalidContainer,
        format!("failed to read entry {} in zip", index),
        file_type,
        "open_part",
    )
    .with_source(cause)
}

fn read_xml<R: Read>(mut part: R, name: &str, file_type: &str) -> Result<String> {
    let mut bytes = Vec::new();
    part.read_to_end(&mut bytes).map_err(|e| {
        ExtractorError::new(
            ErrorKind::InvalidContainer,
            format!("failed to read {}", name),
            file_type,
            "read_part",
        )
        .with_source(e)
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Pattern matching the slide parts of a presentation
pub(crate) fn slide_part_pattern() -> &'static Regex {
    &SLIDE_PART_RE
}

/// Recover Word body text: runs concatenated per paragraph, paragraphs joined by `\n`
pub(crate) fn recover_document_text(xml: &str) -> String {
    let paragraphs: Vec<String> = PARAGRAPH_RE
        .captures_iter(xml)
        .map(|paragraph| {
            WORD_RUN_RE
                .captures_iter(&paragraph[1])
                .map(|run| run[1].to_string())
                .collect::<String>()
        })
        .collect();

    paragraphs.join("\n").trim().to_string()
}

/// Recover slide text: trimmed non-empty runs joined by a single space
pub(crate) fn recover_slide_text(xml: &str) -> String {
    SLIDE_RUN_RE
        .captures_iter(xml)
        .map(|run| run.get(1).map_or("", |m| m.as_str().trim()))
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
