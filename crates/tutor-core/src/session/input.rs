//! Parsing of backend-echoed user input.
//!
//! The backend encodes an attached image inline in the echoed user text using
//! markdown image syntax (`![alt](url)`). The rest of the client never
//! depends on that encoding; everything goes through [`parse_user_input`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one markdown image token `![alt](url)`; the capture is the URL.
static IMAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("image token regex"));

/// Result of splitting echoed user text into content and image reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    /// Text content with the image token removed and surrounding whitespace
    /// trimmed, or the input unchanged when no token was found.
    pub content: String,
    /// URL extracted from the image token, if one was present.
    pub image: Option<String>,
}

/// Extracts an embedded image reference from echoed user text.
///
/// Only the first markdown image token is considered; the protocol carries at
/// most one inline image per message, and any further tokens are left in the
/// text untouched. The function is pure and idempotent: text without a token
/// comes back unchanged.
pub fn parse_user_input(raw: &str) -> ParsedInput {
    match IMAGE_TOKEN.captures(raw) {
        Some(caps) => {
            let url = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let token = caps.get(0).expect("whole match").range();
            let before = raw[..token.start].trim_end();
            let after = raw[token.end..].trim_start();
            let content = if before.is_empty() || after.is_empty() {
                format!("{before}{after}")
            } else {
                format!("{before} {after}")
            };
            ParsedInput {
                content,
                image: Some(url),
            }
        }
        None => ParsedInput {
            content: raw.to_string(),
            image: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_without_token_is_unchanged() {
        let parsed = parse_user_input("what is photosynthesis?");
        assert_eq!(parsed.content, "what is photosynthesis?");
        assert_eq!(parsed.image, None);
    }

    #[test]
    fn test_token_is_extracted_and_removed() {
        let parsed = parse_user_input("hello ![x](http://a/b.png) world");
        assert_eq!(parsed.content, "hello world");
        assert_eq!(parsed.image.as_deref(), Some("http://a/b.png"));
    }

    #[test]
    fn test_image_only_message_yields_empty_content() {
        let parsed = parse_user_input("![diagram](http://a/c.jpg)");
        assert_eq!(parsed.content, "");
        assert_eq!(parsed.image.as_deref(), Some("http://a/c.jpg"));
    }

    #[test]
    fn test_leading_token_is_trimmed() {
        let parsed = parse_user_input("![x](http://a/b.png) explain this");
        assert_eq!(parsed.content, "explain this");
        assert_eq!(parsed.image.as_deref(), Some("http://a/b.png"));
    }

    #[test]
    fn test_only_first_token_is_considered() {
        let parsed = parse_user_input("a ![1](http://a/1.png) b ![2](http://a/2.png)");
        assert_eq!(parsed.image.as_deref(), Some("http://a/1.png"));
        assert_eq!(parsed.content, "a b ![2](http://a/2.png)");
    }

    #[test]
    fn test_idempotent_on_parsed_content() {
        let once = parse_user_input("hello ![x](http://a/b.png) world");
        let twice = parse_user_input(&once.content);
        assert_eq!(twice.content, once.content);
        assert_eq!(twice.image, None);
    }

    #[test]
    fn test_empty_alt_text() {
        let parsed = parse_user_input("see ![](http://a/d.png)");
        assert_eq!(parsed.content, "see");
        assert_eq!(parsed.image.as_deref(), Some("http://a/d.png"));
    }
}
