use std::fmt;

/// Label shown when a caller registers an action without one
pub const DEFAULT_ACTION_LABEL: &str = "Action";

/// Callback run when an action button is pressed
pub type ActionCallback = Box<dyn FnMut() + Send>;

/// Represents an action button that can be displayed on a toast
pub struct ToastAction {
    /// User-visible label for the action button
    pub label: String,
    callback: Option<ActionCallback>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, callback: impl FnMut() + Send + 'static) -> Self {
        Self {
            label: normalize_label(label.into()),
            callback: Some(Box::new(callback)),
        }
    }

    /// An action that only dismisses the toast
    pub fn dismiss(label: impl Into<String>) -> Self {
        Self {
            label: normalize_label(label.into()),
            callback: None,
        }
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Run the callback, if any
    pub fn invoke(&mut self) {
        if let Some(callback) = self.callback.as_mut() {
            callback();
        }
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

fn normalize_label(label: String) -> String {
    if label.trim().is_empty() {
        DEFAULT_ACTION_LABEL.to_string()
    } else {
        label
    }
}
