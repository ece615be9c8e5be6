pub mod action;
pub mod event;
pub mod sanitizer;
pub mod severity;
pub mod severity_style;

pub use action::{ActionCallback, DEFAULT_ACTION_LABEL, ToastAction};
pub use event::{Callback, EventKind, SubscriptionId, ToastEvent, UnknownEvent};
pub use sanitizer::{has_rich_content, sanitize_html, strip_html};
pub use severity::Severity;
pub use severity_style::{Color, ToastStyle, severity_color, severity_colors};
pub use showme_config::Position;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque toast handle, unique for the lifetime of the engine that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which trigger asked for a toast to go away.
///
/// Informational only: every reason goes through the same removal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseReason {
    /// The countdown ran out
    Timeout,
    /// The close control was pressed
    Manual,
    /// A swipe travelled past the threshold
    Gesture,
    /// An action button was pressed
    Action,
    /// Capacity was exceeded and this was the oldest toast
    Eviction,
    /// The host called `close()` on the handle
    Programmatic,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::Timeout => "timeout",
            CloseReason::Manual => "manual",
            CloseReason::Gesture => "gesture",
            CloseReason::Action => "action",
            CloseReason::Eviction => "eviction",
            CloseReason::Programmatic => "programmatic",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a toast displays
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Content {
    Text(String),
    /// Sanitized markup, see [`Content::markup`]
    Markup(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    /// Build rich content. The markup is sanitized here, so presenters can
    /// trust anything they receive as [`Content::Markup`].
    pub fn markup(raw: &str) -> Self {
        Content::Markup(sanitize_html(raw))
    }

    /// Text with all markup removed
    pub fn plain_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Markup(markup) => strip_html(markup),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) | Content::Markup(text) => text.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_markup_content_is_sanitized() {
        let content = Content::markup(r#"<b>Saved</b><script>alert(1)</script>"#);
        match &content {
            Content::Markup(m) => {
                assert!(m.contains("<b>Saved</b>"));
                assert!(!m.contains("script"));
            }
            Content::Text(_) => panic!("expected markup"),
        }
        assert_eq!(content.plain_text(), "Saved");
    }

    #[test]
    fn test_text_content_is_verbatim() {
        let content = Content::text("<b>not markup</b>");
        assert_eq!(content.plain_text(), "<b>not markup</b>");
        assert!(!content.is_empty());
        assert!(Content::default().is_empty());
    }

    #[test]
    fn test_close_reason_display() {
        assert_eq!(CloseReason::Timeout.to_string(), "timeout");
        assert_eq!(CloseReason::Eviction.to_string(), "eviction");
        let json = serde_json::to_string(&CloseReason::Programmatic).unwrap();
        assert_eq!(json, "\"programmatic\"");
    }

    #[test]
    fn test_toast_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ToastId(42)).unwrap(), "42");
        assert_eq!(ToastId(42).to_string(), "#42");
    }
}
