use std::path::Path;

/// Get file extension from path (without the dot)
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// Base name of a path, falling back to the full display form
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert Windows (`\r\n`) and old Mac (`\r`) line endings to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Number of `\n` plus one
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Number of code points
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Whether the path names a legacy binary Office file (.doc, .xls, .ppt)
pub fn is_legacy_office_format(path: &Path) -> bool {
    matches!(
        get_extension(path).as_deref(),
        Some("doc") | Some("xls") | Some("ppt")
    )
}

/// Modern OOXML equivalent of a legacy Office path
pub fn modern_equivalent(path: &Path) -> &'static str {
    match get_extension(path).as_deref() {
        Some("doc") => "DOCX",
        Some("xls") => "XLSX",
        Some("ppt") => "PPTX",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_with_txt() {
        let path = Path::new("/path/to/file.txt");
        assert_eq!(get_extension(path), Some("txt".to_string()));
    }

    #[test]
    fn test_get_extension_lowercase() {
        let path = Path::new("/path/to/file.DOCX");
        assert_eq!(get_extension(path), Some("docx".to_string()));
    }

    #[test]
    fn test_get_extension_no_extension() {
        let path = Path::new("/path/to/file");
        assert_eq!(get_extension(path), None);
    }

    #[test]
    fn test_get_extension_multiple_dots() {
        let path = Path::new("/path/to/report.final.pdf");
        assert_eq!(get_extension(path), Some("pdf".to_string()));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/tmp/dir/sample.png")), "sample.png");
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_normalize_line_endings_idempotent() {
        let inputs = ["a\r\n\r\nb", "\r\r\n\n\r", "plain", ""];
        for input in inputs {
            let once = normalize_line_endings(input);
            let twice = normalize_line_endings(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\ntwo\n"), 3);
    }

    #[test]
    fn test_char_count_uses_code_points() {
        assert_eq!(char_count("héllo"), 5);
        assert_eq!("héllo".len(), 6);
    }

    #[test]
    fn test_is_legacy_office_format() {
        assert!(is_legacy_office_format(Path::new("old.doc")));
        assert!(is_legacy_office_format(Path::new("OLD.XLS")));
        assert!(is_legacy_office_format(Path::new("deck.ppt")));
        assert!(!is_legacy_office_format(Path::new("new.docx")));
        assert!(!is_legacy_office_format(Path::new("noext")));
    }

    #[test]
    fn test_modern_equivalent() {
        assert_eq!(modern_equivalent(Path::new("a.doc")), "DOCX");
        assert_eq!(modern_equivalent(Path::new("a.xls")), "XLSX");
        assert_eq!(modern_equivalent(Path::new("a.PPT")), "PPTX");
        assert_eq!(modern_equivalent(Path::new("a.txt")), "unknown");
    }
}
