use std::fmt;

use serde::{Deserialize, Serialize};
use showme_util::{Callback, Position, Severity, ToastAction, ToastEvent};

/// Everything a caller can ask for when showing a toast.
///
/// Unset fields fall back to the engine's [`showme_config::ToastConfig`].
#[derive(Default)]
pub struct ToastOptions {
    pub message: Option<String>,
    pub severity: Option<Severity>,
    /// 0 means persistent
    pub duration_ms: Option<u32>,
    pub persistent: bool,
    pub position: Option<Position>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub corner_radius: Option<u32>,
    pub animation_enabled: Option<bool>,
    /// Rich markup shown instead of `message`
    pub custom_content: Option<String>,
    pub actions: Vec<ToastAction>,
    /// Capacity override for this admission only
    pub max_visible: Option<u32>,
    pub on_show: Option<Callback>,
    pub on_close: Option<Callback>,
    pub on_click: Option<Callback>,
}

impl ToastOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn colors(mut self, background: impl Into<String>, text: impl Into<String>) -> Self {
        self.background_color = Some(background.into());
        self.text_color = Some(text.into());
        self
    }

    pub fn corner_radius(mut self, radius: u32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn animated(mut self, enabled: bool) -> Self {
        self.animation_enabled = Some(enabled);
        self
    }

    pub fn custom_content(mut self, markup: impl Into<String>) -> Self {
        self.custom_content = Some(markup.into());
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn max_visible(mut self, max_visible: u32) -> Self {
        self.max_visible = Some(max_visible);
        self
    }

    pub fn on_show(mut self, callback: impl FnMut(&ToastEvent) + Send + 'static) -> Self {
        self.on_show = Some(Box::new(callback));
        self
    }

    pub fn on_close(mut self, callback: impl FnMut(&ToastEvent) + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn on_click(mut self, callback: impl FnMut(&ToastEvent) + Send + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("message", &self.message)
            .field("severity", &self.severity)
            .field("duration_ms", &self.duration_ms)
            .field("persistent", &self.persistent)
            .field("position", &self.position)
            .field("custom_content", &self.custom_content.is_some())
            .field("actions", &self.actions)
            .field("max_visible", &self.max_visible)
            .finish_non_exhaustive()
    }
}

/// In-place changes to a live toast. Queue position and timer are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastPatch {
    pub message: Option<String>,
    pub custom_content: Option<String>,
    pub severity: Option<Severity>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub corner_radius: Option<u32>,
}

impl ToastPatch {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
