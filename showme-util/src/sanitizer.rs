use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RICH_TAG: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"<\s*/?(?:b|i|u|a|p|br|span|strong|em)(?:\s+[^>]*)?>").expect("valid regex"));

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*(?:br|/p)\s*/?>").expect("valid regex"));

/// Sanitize caller supplied rich content before it reaches a presenter.
///
/// Allowed tags: b, i, u, strong, em, span, a, br, p
/// Allowed attributes: href (on a tags only)
/// Allowed URL schemes: http, https, mailto
///
/// Scripts, styles, embedded media, event handlers and dangerous URL schemes
/// are dropped. Links get rel="noopener noreferrer".
pub fn sanitize_html(html: &str) -> String {
  let allowed_tags: HashSet<&str> = ["b", "i", "u", "strong", "em", "span", "a", "br", "p"]
    .into_iter()
    .collect();

  let allowed_attrs: HashSet<&str> = std::iter::once("href").collect();

  let url_schemes: HashSet<&str> = ["http", "https", "mailto"].into_iter().collect();

  Builder::default()
    .tags(allowed_tags)
    .link_rel(Some("noopener noreferrer"))
    .url_schemes(url_schemes)
    .generic_attributes(HashSet::new())
    .tag_attributes(std::iter::once(("a", allowed_attrs)).collect())
    .clean(html)
    .to_string()
}

/// Check if text contains markup that a rich presenter would style.
///
/// Escaped entities like `&lt;b&gt;` and comparisons like `5 < 10` do not count.
pub fn has_rich_content(text: &str) -> bool {
  RICH_TAG.is_match(text)
}

/// Strip all tags, returning plain text for presenters without rich rendering.
///
/// `<br>` and `</p>` become newlines.
pub fn strip_html(html: &str) -> String {
  let with_breaks = LINE_BREAK.replace_all(html, "\n");
  let without_tags = ANY_TAG.replace_all(&with_breaks, "");

  decode_entities(&without_tags)
}

/// Decode common HTML entities to their character equivalents
fn decode_entities(text: &str) -> String {
  text
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&#x27;", "'")
    .replace("&#x2F;", "/")
    .replace("&#47;", "/")
    .replace("&nbsp;", " ")
    .replace("&amp;", "&") // Must be last to avoid double-decoding
}
