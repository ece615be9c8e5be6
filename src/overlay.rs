//! One-shot modal overlays.
//!
//! Dialogs are small plugins over [`OverlayAdapter`]: they describe what to
//! show, attach a handler for button presses and let the adapter tear the
//! overlay down. They never interact with the toast queues.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayId(pub u64);

/// What an overlay displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlaySpec {
    /// Dialog kind, e.g. `confirm`
    pub kind: &'static str,
    pub title: Option<String>,
    pub body: String,
    /// Button labels in display order
    pub buttons: Vec<String>,
}

/// Runs when button `index` is pressed. Returning true closes the overlay.
pub type OverlayHandler = Box<dyn FnMut(usize) -> bool + Send>;

/// Capability a host provides for modal overlays.
pub trait OverlayAdapter {
    fn create(&mut self, spec: OverlaySpec) -> OverlayId;

    /// Replace the press handler of `id`. Unknown ids are ignored.
    fn attach(&mut self, id: OverlayId, handler: OverlayHandler);

    /// Remove the overlay. Removing twice is a no-op.
    fn destroy(&mut self, id: OverlayId);
}

pub const CONFIRM_LABEL: &str = "Confirm";
pub const CANCEL_LABEL: &str = "Cancel";

pub struct ConfirmOptions {
    pub title: Option<String>,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub on_confirm: Option<Box<dyn FnOnce() + Send>>,
    pub on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ConfirmOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
            confirm_label: CONFIRM_LABEL.to_string(),
            cancel_label: CANCEL_LABEL.to_string(),
            on_confirm: None,
            on_cancel: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn on_confirm(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ConfirmOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmOptions")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("confirm_label", &self.confirm_label)
            .field("cancel_label", &self.cancel_label)
            .finish_non_exhaustive()
    }
}

/// Ask a yes/no question. Buttons are `[cancel, confirm]`; either one closes
/// the dialog after running its callback.
pub fn confirm(adapter: &mut impl OverlayAdapter, options: ConfirmOptions) -> OverlayId {
    let ConfirmOptions {
        title,
        message,
        confirm_label,
        cancel_label,
        mut on_confirm,
        mut on_cancel,
    } = options;

    let id = adapter.create(OverlaySpec {
        kind: "confirm",
        title,
        body: message,
        buttons: vec![cancel_label, confirm_label],
    });
    adapter.attach(
        id,
        Box::new(move |index: usize| {
            let callback = match index {
                0 => on_cancel.take(),
                1 => on_confirm.take(),
                _ => return false,
            };
            if let Some(callback) = callback {
                callback();
            }
            true
        }),
    );
    id
}
