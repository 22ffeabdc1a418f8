//! Front matter extraction and parsing.

use indexmap::IndexMap;
use pulldown_cmark::{Event, MetadataBlockKind, Parser, Tag, TagEnd};

use crate::render::parser_options;

/// Ordered `key: value` pairs taken from a post's front matter.
pub type Metadata = IndexMap<String, String>;

/// Extract the front matter of a Markdown document.
///
/// The document must open with a block delimited by `---` lines; a block
/// closed by `...` does not count. Every line inside it is split on its first
/// colon; both halves are trimmed. A key that appears twice keeps the last value.
pub fn extract_metadata(source: &str) -> Result<Metadata, FrontmatterError> {
    let mut parser = Parser::new_ext(source, parser_options()).into_offset_iter();

    match parser.next() {
        Some((Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)), range))
            if source[range.clone()].trim_end().ends_with("---") => {}
        _ => return Err(FrontmatterError::Missing),
    }

    let mut raw = String::new();
    for (event, _) in parser {
        match event {
            Event::Text(text) => raw.push_str(&text),
            Event::End(TagEnd::MetadataBlock(_)) => break,
            _ => {}
        }
    }

    parse_metadata(&raw)
}

/// Parse the raw content of a front matter block.
///
/// An empty block is malformed: it has a single, blank line.
pub fn parse_metadata(raw: &str) -> Result<Metadata, FrontmatterError> {
    let mut metadata = Metadata::new();

    let body = raw.trim_end_matches(['\n', '\r']);
    if body.is_empty() {
        return Err(FrontmatterError::Malformed {
            line: String::new(),
        });
    }

    for line in body.lines() {
        let Some((key, value)) = line.split_once(':') else {
            return Err(FrontmatterError::Malformed {
                line: line.to_string(),
            });
        };
        metadata.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(metadata)
}

/// Errors that can occur when reading front matter.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Missing front matter block - document must start with ---")]
    Missing,

    #[error("Malformed front matter line (expected `key: value`): {line:?}")]
    Malformed { line: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_ordered_metadata() {
        let source = "---\ntitle: Hello\ndate: 2024-01-01\n---\n# Hi\n\nBody.\n";

        let metadata = extract_metadata(source).unwrap();

        let pairs: Vec<_> = metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("title", "Hello"), ("date", "2024-01-01")]);
    }

    #[test]
    fn splits_on_first_colon_only() {
        let source = "---\ntime: 10:30\nlink : https://example.org \n---\nBody";

        let metadata = extract_metadata(source).unwrap();

        assert_eq!(metadata["time"], "10:30");
        assert_eq!(metadata["link"], "https://example.org");
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let source = "---\ntitle: First\nauthor: Ada\ntitle: Second\n---\nBody";

        let metadata = extract_metadata(source).unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["title"], "Second");
    }

    #[test]
    fn errors_without_front_matter() {
        let source = "# Just Markdown\n\nNo front matter here.";

        assert_eq!(extract_metadata(source), Err(FrontmatterError::Missing));
    }

    #[test]
    fn errors_on_empty_document() {
        assert_eq!(extract_metadata(""), Err(FrontmatterError::Missing));
    }

    #[test]
    fn front_matter_must_open_the_document() {
        let source = "Intro paragraph.\n\n---\ntitle: Late\n---\n";

        assert_eq!(extract_metadata(source), Err(FrontmatterError::Missing));
    }

    #[test]
    fn errors_on_line_without_colon() {
        let source = "---\ntitle: Hello\njust some words\n---\nBody";

        assert_eq!(
            extract_metadata(source),
            Err(FrontmatterError::Malformed {
                line: "just some words".to_string()
            })
        );
    }

    #[test]
    fn parses_crlf_block_content() {
        let metadata = parse_metadata("title: Hello\r\ndate: 2024-01-01\r\n").unwrap();

        assert_eq!(metadata["title"], "Hello");
        assert_eq!(metadata["date"], "2024-01-01");
    }

    #[test]
    fn empty_block_is_malformed() {
        assert_eq!(
            parse_metadata(""),
            Err(FrontmatterError::Malformed {
                line: String::new()
            })
        );
        assert!(extract_metadata("---\n---\nBody\n").is_err());
    }

    #[test]
    fn block_must_close_with_dashes() {
        let source = "---\ntitle: Hello\n...\nBody\n";

        assert_eq!(extract_metadata(source), Err(FrontmatterError::Missing));
    }

    #[test]
    fn empty_value_is_kept() {
        let metadata = parse_metadata("subtitle:\n").unwrap();

        assert_eq!(metadata["subtitle"], "");
    }
}
