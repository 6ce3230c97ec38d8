use std::sync::LazyLock;

use regex::Regex;

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*"([^"]*)""#).unwrap());
static IMG_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p>\s*<img\b[^>]*>\s*</p>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Split an entry summary into the poster URL and the plain-text review.
pub fn extract_poster_and_review(summary: &str) -> (Option<String>, String) {
    let poster = IMG_SRC_RE
        .captures(summary)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    // Paragraph-wrapped poster goes first so no empty paragraph is left behind.
    let without_poster = IMG_PARAGRAPH_RE.replace_all(summary, "");
    let stripped = TAG_RE.replace_all(without_poster.trim(), "");
    let review = decode_entities(stripped.trim());

    (poster, review)
}

/// Decode the HTML entities Letterboxd leaves in review text. `&lt;` and
/// `&gt;` stay encoded so the review never carries markup characters.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
