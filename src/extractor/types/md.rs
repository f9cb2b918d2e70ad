use crate::error::Result;
use crate::extractor::r#trait::TextExtractor;
use crate::extractor::types::PlainTextExtractor;
use crate::models::{ExtractOptions, ExtractResult};
use std::io::Read;

/// Markdown handler layered on the plain text pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor {
    base: PlainTextExtractor,
}

impl MarkdownExtractor {
    pub const FILE_TYPE: &'static str = "markdown";

    pub fn new() -> Self {
        Self {
            base: PlainTextExtractor::new(),
        }
    }
}

/// Remove heading markers, emphasis, code ticks and list markers line by line
fn strip_markdown_syntax(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let line = line.trim_start_matches(|c| c == '#' || c == ' ');
            let line = line
                .replace("**", "")
                .replace("__", "")
                .replace(['*', '_', '`'], "");
            line.trim_start_matches(|c| c == '-' || c == '+' || c == ' ')
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_headings(text: &str) -> usize {
    text.split('\n')
        .filter(|line| line.trim().starts_with('#'))
        .count()
}

/// Count `[text](url)` sequences with a single-pass bracket scan.
///
/// Nested or malformed brackets are not handled specially.
fn count_links(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut in_link = false;
    let mut in_url = false;

    for (i, c) in text.char_indices() {
        match c {
            '[' if !in_link && !in_url => in_link = true,
            ']' if in_link && bytes.get(i + 1) == Some(&b'(') => {
                in_link = false;
                in_url = true;
            }
            ')' if in_url => {
                in_url = false;
                count += 1;
            }
            _ => {}
        }
    }

    count
}

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, reader: &mut dyn Read, options: &ExtractOptions) -> Result<ExtractResult> {
        let mut result = self.base.extract(reader, options)?;

        if !options.preserve_formatting {
            result.text = strip_markdown_syntax(&result.text);
        }

        let headings = count_headings(&result.text);
        let links = count_links(&result.text);
        result.set_meta("heading_count", headings);
        result.set_meta("link_count", links);
        result.file_type = Self::FILE_TYPE.to_string();

        Ok(result)
    }

    fn supported_types(&self) -> &[&'static str] {
        &["md", "markdown"]
    }

    fn file_type(&self) -> &'static str {
        Self::FILE_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn extract(content: &str, preserve_formatting: bool) -> ExtractResult {
        let options = ExtractOptions {
            preserve_formatting,
            ..Default::default()
        };
        MarkdownExtractor::new()
            .extract(&mut Cursor::new(content.as_bytes().to_vec()), &options)
            .unwrap()
    }

    #[test]
    fn test_strip_markdown_syntax() {
        let stripped = strip_markdown_syntax("# Title\n**bold** and _it_\n- item\n+ other\n`code`");
        assert_eq!(stripped, "Title\nbold and it\nitem\nother\ncode");
    }

    #[test]
    fn test_markdown_preserved() {
        let result = extract("# Hello\n\nSee [docs](http://x.io) and [more](y).\n## Next", true);
        assert_eq!(result.file_type, "markdown");
        assert_eq!(result.text, "# Hello\n\nSee [docs](http://x.io) and [more](y).\n## Next");
        assert_eq!(result.metadata["heading_count"], 2);
        assert_eq!(result.metadata["link_count"], 2);
    }

    #[test]
    fn test_markdown_stripped_counts_after_stripping() {
        let result = extract("# Hello\n\nWorld with [a link](http://example.com)", false);
        assert_eq!(result.text, "Hello\n\nWorld with [a link](http://example.com)");
        assert_eq!(result.metadata["heading_count"], 0);
        assert_eq!(result.metadata["link_count"], 1);
    }

    #[test]
    fn test_count_links_requires_paren_after_bracket() {
        assert_eq!(count_links("[not a link] (gap)"), 0);
        assert_eq!(count_links("[a](b)[c](d)"), 2);
        assert_eq!(count_links("no links here"), 0);
    }

    #[test]
    fn test_count_headings_ignores_indent() {
        assert_eq!(count_headings("  # indented\ntext\n#tight"), 2);
    }

    #[test]
    fn test_supported_types() {
        let extractor = MarkdownExtractor::new();
        assert_eq!(extractor.supported_types(), &["md", "markdown"]);
    }
}
