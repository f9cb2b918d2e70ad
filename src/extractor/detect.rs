use crate::error::{ErrorKind, ExtractorError, Result};
use crate::extractor::r#trait::open_file;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use zip::ZipArchive;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_PPT: &str = "application/vnd.ms-powerpoint";
pub const MIME_ZIP: &str = "application/zip";
pub const MIME_OLE: &str = "application/x-ole-storage";
pub const MIME_TEXT: &str = "text/plain";

const TAG: &str = "detect";

/// Bytes inspected for magic numbers and the text heuristic
const HEAD_LEN: u64 = 8 * 1024;
/// Bytes scanned for OLE stream names
const OLE_SCAN_LEN: u64 = 1024 * 1024;

const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content-based file classification.
///
/// `Ok(None)` means the content was read but could not be classified; a file
/// that cannot be read at all is an error.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, path: &Path) -> Result<Option<String>>;
}

/// Magic-number sniffer with ZIP and OLE container inspection
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl MagicSniffer {
    pub fn new() -> Self {
        Self
    }
}

fn read_error(path: &Path, e: std::io::Error) -> ExtractorError {
    ExtractorError::new(
        ErrorKind::Open,
        format!("failed to read file {}", path.display()),
        TAG,
        "sniff",
    )
    .with_source(e)
}

fn read_prefix(file: &mut File, limit: u64) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.take(limit).read_to_end(&mut buf)?;
    Ok(buf)
}

impl MimeSniffer for MagicSniffer {
    fn sniff(&self, path: &Path) -> Result<Option<String>> {
        let mut file = open_file(path, TAG)?;
        let head = read_prefix(&mut file, HEAD_LEN).map_err(|e| read_error(path, e))?;

        let mime = if head.starts_with(b"%PDF-") {
            Some(MIME_PDF)
        } else if head.starts_with(b"PK\x03\x04") || head.starts_with(b"PK\x05\x06") {
            Some(zip_mime(&mut file))
        } else if head.starts_with(&OLE_MAGIC) {
            let body = read_prefix(&mut file, OLE_SCAN_LEN).map_err(|e| read_error(path, e))?;
            Some(ole_mime(&body))
        } else {
            image_mime(&head).or_else(|| text_mime(&head))
        };

        log::debug!("sniffed {} as {:?}", path.display(), mime);
        Ok(mime.map(str::to_string))
    }
}

/// Classify a ZIP by its well-known OOXML parts
fn zip_mime(file: &mut File) -> &'static str {
    if file.seek(SeekFrom::Start(0)).is_err() {
        return MIME_ZIP;
    }
    let archive = match ZipArchive::new(&mut *file) {
        Ok(archive) => archive,
        Err(_) => return MIME_ZIP,
    };

    let mut mime = MIME_ZIP;
    for name in archive.file_names() {
        match name {
            "word/document.xml" => return MIME_DOCX,
            "xl/workbook.xml" => return MIME_XLSX,
            "ppt/presentation.xml" => return MIME_PPTX,
            _ if name.starts_with("ppt/slides/") => mime = MIME_PPTX,
            _ => {}
        }
    }
    mime
}

fn utf16le(name: &str) -> Vec<u8> {
    name.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Classify an OLE compound file by the stream names in its directory
fn ole_mime(body: &[u8]) -> &'static str {
    if contains(body, &utf16le("WordDocument")) {
        MIME_DOC
    } else if contains(body, &utf16le("PowerPoint Document")) {
        MIME_PPT
    } else if contains(body, &utf16le("Workbook")) || contains(body, &utf16le("Book")) {
        MIME_XLS
    } else {
        MIME_OLE
    }
}

fn image_mime(head: &[u8]) -> Option<&'static str> {
    let mime = match head {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'B', b'M', ..] if head.len() >= 14 => "image/bmp",
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => "image/tiff",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => return None,
    };
    Some(mime)
}

/// Text heuristic: BOM, or no NUL bytes and few control characters
fn text_mime(head: &[u8]) -> Option<&'static str> {
    if head.starts_with(&[0xFF, 0xFE]) || head.starts_with(&[0xFE, 0xFF]) {
        return Some(MIME_TEXT);
    }
    if head.contains(&0) {
        return None;
    }

    let control = head
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C)) || b == 0x7F)
        .count();
    if control * 20 > head.len() {
        return None;
    }

    let trimmed = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let trimmed = &trimmed[trimmed.iter().take_while(|b| b.is_ascii_whitespace()).count()..];
    let lower: Vec<u8> = trimmed.iter().take(16).map(u8::to_ascii_lowercase).collect();
    if lower.starts_with(b"<?xml") {
        Some("text/xml")
    } else if lower.starts_with(b"<!doctype html") || lower.starts_with(b"<html") {
        Some("text/html")
    } else {
        Some(MIME_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::types::image::fixtures::png_bytes;
    use crate::extractor::types::ooxml::fixtures::zip_bytes;
    use crate::extractor::types::pdf::fixtures::pdf_bytes;
    use tempfile::TempDir;

    fn sniff_bytes(bytes: &[u8]) -> Option<String> {
        let dir = TempDir::new().unwrap();
        // Misleading extension: detection must not look at it
        let path = dir.path().join("file.bin");
        std::fs::write(&path, bytes).unwrap();
        MagicSniffer::new().sniff(&path).unwrap()
    }

    fn ole_bytes(stream: &str) -> Vec<u8> {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.resize(1024, 0);
        bytes.extend(utf16le(stream));
        bytes.resize(2048, 0);
        bytes
    }

    #[test]
    fn test_sniff_pdf() {
        assert_eq!(sniff_bytes(&pdf_bytes(&[&["x"]])).as_deref(), Some(MIME_PDF));
    }

    #[test]
    fn test_sniff_ooxml() {
        let docx = zip_bytes(&[("[Content_Types].xml", "<Types/>"), ("word/document.xml", "<w:document/>")]);
        let xlsx = zip_bytes(&[("xl/workbook.xml", "<workbook/>")]);
        let pptx = zip_bytes(&[("ppt/presentation.xml", "<p:presentation/>")]);
        let plain = zip_bytes(&[("notes.txt", "hi")]);

        assert_eq!(sniff_bytes(&docx).as_deref(), Some(MIME_DOCX));
        assert_eq!(sniff_bytes(&xlsx).as_deref(), Some(MIME_XLSX));
        assert_eq!(sniff_bytes(&pptx).as_deref(), Some(MIME_PPTX));
        assert_eq!(sniff_bytes(&plain).as_deref(), Some(MIME_ZIP));
    }

    #[test]
    fn test_sniff_legacy_office() {
        assert_eq!(sniff_bytes(&ole_bytes("WordDocument")).as_deref(), Some(MIME_DOC));
        assert_eq!(sniff_bytes(&ole_bytes("Workbook")).as_deref(), Some(MIME_XLS));
        assert_eq!(sniff_bytes(&ole_bytes("PowerPoint Document")).as_deref(), Some(MIME_PPT));
        assert_eq!(sniff_bytes(&ole_bytes("Other")).as_deref(), Some(MIME_OLE));
    }

    #[test]
    fn test_sniff_text() {
        assert_eq!(sniff_bytes(b"hello\nworld\n").as_deref(), Some(MIME_TEXT));
        assert_eq!(sniff_bytes(b"caf\xe9 latin-1").as_deref(), Some(MIME_TEXT));
        assert_eq!(sniff_bytes(b"<?xml version=\"1.0\"?><a/>").as_deref(), Some("text/xml"));
        assert_eq!(sniff_bytes(b"").as_deref(), Some(MIME_TEXT));
        assert_eq!(sniff_bytes(&[0xFF, 0xFE, b'h', 0]).as_deref(), Some(MIME_TEXT));
    }

    #[test]
    fn test_sniff_image() {
        assert_eq!(sniff_bytes(&png_bytes(2, 2)).as_deref(), Some("image/png"));
    }

    #[test]
    fn test_sniff_unknown_binary() {
        assert_eq!(sniff_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]), None);
    }

    #[test]
    fn test_sniff_missing_file() {
        let err = MagicSniffer::new()
            .sniff(Path::new("/no/such/file.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Open);
    }
}
