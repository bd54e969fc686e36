//! Review text normalization
//!
//! Cleanup applied to every review before it reaches a classifier:
//! 1. lowercase
//! 2. drop `<...>` tags (non-greedy, no nesting awareness)
//! 3. drop URLs starting with `http://`, `https://` or `www.`
//! 4. drop every char except word chars, whitespace and `. , ! ?`
//! 5. collapse whitespace runs and trim
//!
//! Steps 1-4 repeat until the text stops changing, so removing a stray
//! symbol can never leave behind a URL that survives (`ww#w.x` -> `www.x`).
//! This makes `normalize` a projection: `normalize(normalize(x)) == normalize(x)`.

use regex::Regex;
use reviewsense_core::Result;

/// Deterministic text cleaner for review input
pub struct TextNormalizer {
    html_regex: Regex,
    url_regex: Regex,
    special_regex: Regex,
    whitespace_regex: Regex,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            html_regex: Regex::new(r"<.*?>").map_err(|e| {
                reviewsense_core::Error::internal(format!("Failed to compile HTML regex: {}", e))
            })?,
            url_regex: Regex::new(r"https?://\S+|www\.\S+").map_err(|e| {
                reviewsense_core::Error::internal(format!("Failed to compile URL regex: {}", e))
            })?,
            special_regex: Regex::new(r"[^\w\s.,!?]").map_err(|e| {
                reviewsense_core::Error::internal(format!(
                    "Failed to compile special character regex: {}",
                    e
                ))
            })?,
            whitespace_regex: Regex::new(r"\s+").map_err(|e| {
                reviewsense_core::Error::internal(format!(
                    "Failed to compile whitespace regex: {}",
                    e
                ))
            })?,
        })
    }

    /// Normalize a single review text. May return an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.strip(text);
        loop {
            let next = self.strip(&current);
            if next == current {
                break;
            }
            current = next;
        }

        self.whitespace_regex
            .replace_all(&current, " ")
            .trim()
            .to_string()
    }

    /// Normalize a batch of texts, preserving order
    pub fn normalize_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.normalize(t.as_ref())).collect()
    }

    fn strip(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let no_html = self.html_regex.replace_all(&lowered, "");
        let no_urls = self.url_regex.replace_all(&no_html, "");
        self.special_regex.replace_all(&no_urls, "").into_owned()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create text normalizer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        TextNormalizer::new().unwrap().normalize(text)
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(normalize("HELLO WORLD"), "hello world");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize("too    many    spaces"), "too many spaces");
        assert_eq!(normalize("  tabs\tand\nnewlines  "), "tabs and newlines");
    }

    #[test]
    fn test_html_removal() {
        assert_eq!(normalize("<p>text with html</p>"), "text with html");
        assert_eq!(
            normalize("<div>This product is <strong>fantastic</strong>!</div>"),
            "this product is fantastic!"
        );
    }

    #[test]
    fn test_unmatched_angle_bracket() {
        // no closing '>' so nothing is treated as a tag; '<' itself is filtered
        assert_eq!(normalize("5 < 6 is true"), "5 6 is true");
    }

    #[test]
    fn test_url_removal() {
        assert_eq!(normalize("check out https://example.com"), "check out");
        assert_eq!(normalize("see www.example.com/page now"), "see now");
        assert_eq!(normalize("URL: https://example.com"), "url");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(
            normalize("text with #hashtag and @mention"),
            "text with hashtag and mention"
        );
        assert_eq!(
            normalize("This has, some. punctuation!"),
            "this has, some. punctuation!"
        );
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn test_everything_stripped() {
        assert_eq!(normalize("<b></b> @#$% https://x.io"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_exposed_url_is_removed() {
        assert_eq!(normalize("ww#w.example.com great"), "great");
    }

    #[test]
    fn test_batch_preserves_order() {
        let normalizer = TextNormalizer::new().unwrap();
        let processed = normalizer.normalize_batch(&[
            "This is GREAT!",
            "<p>HTML content</p>",
            "URL: https://example.com",
        ]);

        assert_eq!(processed, vec!["this is great!", "html content", "url"]);
    }

    #[test]
    fn test_real_world_review() {
        let text = "Just got my new #ProductX and it's absolutely AMAZING! @CompanyName has outdone themselves!";
        let result = normalize(text);
        assert!(result.contains("amazing!"));
        assert!(!result.contains('#'));
        assert!(!result.contains('@'));
        assert!(!result.contains('\''));
    }
}
