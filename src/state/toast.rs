use std::time::{Duration, Instant};

use serde::Serialize;
use showme_config::ToastConfig;
use showme_util::{
    CloseReason, Content, EventKind, Position, Severity, SubscriptionId, ToastAction, ToastId,
    ToastStyle,
};

use super::IdAllocator;
use super::emitter::Emitter;
use super::timer::Countdown;
use crate::options::{ToastOptions, ToastPatch};

/// Lifecycle of a toast.
///
/// `Pending → Visible → Paused ⇄ Visible → Removing → Removed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastState {
    /// Created, not yet handed to the presenter
    Pending,
    Visible,
    /// Countdown suspended by the host
    Paused,
    /// Exit transition running; the toast still holds its queue slot
    Removing,
    /// Terminal
    Removed,
}

impl ToastState {
    pub fn can_become(self, next: ToastState) -> bool {
        use ToastState::*;
        matches!(
            (self, next),
            (Pending, Visible)
                | (Visible, Paused)
                | (Paused, Visible)
                | (Pending | Visible | Paused, Removing)
                | (Removing, Removed)
        )
    }

    /// Visible or paused: the toast accepts updates, clicks and gestures.
    pub fn is_live(self) -> bool {
        matches!(self, ToastState::Visible | ToastState::Paused)
    }

    /// A removal was already requested or finished.
    pub fn is_closing(self) -> bool {
        matches!(self, ToastState::Removing | ToastState::Removed)
    }
}

/// One requested toast
#[derive(Debug)]
pub struct Toast {
    id: ToastId,
    content: Content,
    severity: Severity,
    position: Position,
    style: ToastStyle,
    background_override: Option<String>,
    text_override: Option<String>,
    animation_enabled: bool,
    actions: Vec<ToastAction>,
    capacity: usize,
    created_at: Instant,
    state: ToastState,
    close_reason: Option<CloseReason>,
    pub(crate) countdown: Option<Countdown>,
    pub(crate) gesture_origin: Option<f32>,
    pub(crate) emitter: Emitter,
}

impl Toast {
    /// Resolve `options` against a copy of the defaults. `config` is never written.
    pub(crate) fn new(
        id: ToastId,
        options: ToastOptions,
        config: &ToastConfig,
        now: Instant,
        subscriptions: &IdAllocator,
    ) -> Self {
        let ToastOptions {
            message,
            severity,
            duration_ms,
            persistent,
            position,
            background_color,
            text_color,
            corner_radius,
            animation_enabled,
            custom_content,
            actions,
            max_visible,
            on_show,
            on_close,
            on_click,
        } = options;

        let content = match custom_content {
            Some(markup) => Content::markup(&markup),
            None => Content::Text(message.unwrap_or_default()),
        };
        if content.is_empty() {
            tracing::debug!("{id} has no message, showing it empty");
        }

        let severity = severity.unwrap_or_default();
        let duration_ms = if persistent {
            0
        } else {
            duration_ms.unwrap_or(config.default_duration_ms)
        };
        let countdown =
            (duration_ms > 0).then(|| Countdown::new(Duration::from_millis(u64::from(duration_ms))));

        let style = ToastStyle::resolve(
            severity,
            background_color.as_deref(),
            text_color.as_deref(),
            corner_radius.unwrap_or(config.corner_radius),
        );

        let mut emitter = Emitter::new();
        for (kind, callback) in [
            (EventKind::Show, on_show),
            (EventKind::Close, on_close),
            (EventKind::Click, on_click),
        ] {
            if let Some(callback) = callback {
                emitter.subscribe(SubscriptionId(subscriptions.next()), kind, callback);
            }
        }

        Self {
            id,
            content,
            severity,
            position: position.unwrap_or(config.default_position),
            style,
            background_override: background_color,
            text_override: text_color,
            animation_enabled: animation_enabled.unwrap_or(config.animation_enabled),
            actions,
            capacity: max_visible.map_or_else(|| config.capacity(), |max| max.max(1) as usize),
            created_at: now,
            state: ToastState::Pending,
            close_reason: None,
            countdown,
            gesture_origin: None,
            emitter,
        }
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn style(&self) -> &ToastStyle {
        &self.style
    }

    pub fn is_animated(&self) -> bool {
        self.animation_enabled
    }

    pub fn actions(&self) -> &[ToastAction] {
        &self.actions
    }

    /// Capacity this toast was admitted with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn state(&self) -> ToastState {
        self.state
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    pub fn is_persistent(&self) -> bool {
        self.countdown.is_none()
    }

    /// Full display duration, `None` when persistent
    pub fn duration(&self) -> Option<Duration> {
        self.countdown.as_ref().map(Countdown::total)
    }

    /// Countdown left as of `now`, `None` when persistent
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.countdown.as_ref().map(|c| c.remaining_at(now))
    }

    /// Move to `next` if the state machine allows it.
    pub(crate) fn advance(&mut self, next: ToastState) -> bool {
        if !self.state.can_become(next) {
            return false;
        }
        tracing::trace!("{} {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        true
    }

    /// First removal request wins; later ones return false.
    pub(crate) fn begin_removal(&mut self, reason: CloseReason) -> bool {
        if !self.advance(ToastState::Removing) {
            return false;
        }
        self.close_reason = Some(reason);
        true
    }

    pub(crate) fn action_mut(&mut self, index: usize) -> Option<&mut ToastAction> {
        self.actions.get_mut(index)
    }

    pub(crate) fn apply(&mut self, patch: ToastPatch) {
        let ToastPatch {
            message,
            custom_content,
            severity,
            background_color,
            text_color,
            corner_radius,
        } = patch;

        if let Some(markup) = custom_content {
            self.content = Content::markup(&markup);
        } else if let Some(message) = message {
            self.content = Content::Text(message);
        }
        if let Some(severity) = severity {
            self.severity = severity;
        }
        if background_color.is_some() {
            self.background_override = background_color;
        }
        if text_color.is_some() {
            self.text_override = text_color;
        }
        self.style = ToastStyle::resolve(
            self.severity,
            self.background_override.as_deref(),
            self.text_override.as_deref(),
            corner_radius.unwrap_or(self.style.corner_radius),
        );
    }

    pub fn snapshot(&self, now: Instant) -> ToastSnapshot {
        ToastSnapshot {
            id: self.id,
            position: self.position,
            state: self.state,
            severity: self.severity,
            text: self.content.plain_text(),
            remaining_ms: self.remaining(now).map(|d| d.as_millis() as u64),
            actions: self.actions.iter().map(|a| a.label.clone()).collect(),
        }
    }
}

/// Read-only view of a toast for hosts and the `list` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastSnapshot {
    pub id: ToastId,
    pub position: Position,
    pub state: ToastState,
    pub severity: Severity,
    pub text: String,
    pub remaining_ms: Option<u64>,
    pub actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use showme_util::severity_colors;

    fn build(options: ToastOptions) -> Toast {
        Toast::new(
            ToastId(1),
            options,
            &ToastConfig::default(),
            Instant::now(),
            &IdAllocator::new(),
        )
    }

    #[test]
    fn test_state_machine_transitions() {
        use ToastState::*;
        assert!(Pending.can_become(Visible));
        assert!(Visible.can_become(Paused));
        assert!(Paused.can_become(Visible));
        assert!(Visible.can_become(Removing));
        assert!(Paused.can_become(Removing));
        assert!(Removing.can_become(Removed));

        assert!(!Pending.can_become(Paused));
        assert!(!Removing.can_become(Removing));
        assert!(!Removing.can_become(Visible));
        assert!(!Removed.can_become(Visible));
        assert!(!Removed.can_become(Removing));
        assert!(!Visible.can_become(Removed));
    }

    #[test]
    fn test_defaults_come_from_config() {
        let toast = build(ToastOptions::new("Saved"));

        assert_eq!(toast.state(), ToastState::Pending);
        assert_eq!(toast.severity(), Severity::Info);
        assert_eq!(toast.position(), Position::TopRight);
        assert_eq!(toast.duration(), Some(Duration::from_millis(4000)));
        assert_eq!(toast.capacity(), 5);
        assert!(!toast.is_animated());
        assert_eq!(toast.style().corner_radius, 4);
        assert_eq!(toast.style().background, severity_colors::INFO);
    }

    #[test]
    fn test_persistent_has_no_countdown() {
        assert!(build(ToastOptions::new("x").persistent()).is_persistent());
        assert!(build(ToastOptions::new("x").duration_ms(0)).is_persistent());
        assert!(
            build(ToastOptions::new("x").duration_ms(900).persistent()).is_persistent(),
            "persistent wins over an explicit duration"
        );
    }

    #[test]
    fn test_custom_content_wins_over_message() {
        let toast = build(ToastOptions::new("plain").custom_content("<b>rich</b><script>x</script>"));
        assert!(matches!(toast.content(), Content::Markup(_)));
        assert_eq!(toast.content().plain_text(), "rich");
    }

    #[test]
    fn test_missing_message_is_empty_text() {
        let toast = build(ToastOptions::default());
        assert_eq!(toast.content(), &Content::Text(String::new()));
    }

    #[test]
    fn test_capacity_override_has_floor() {
        assert_eq!(build(ToastOptions::new("x").max_visible(2)).capacity(), 2);
        assert_eq!(build(ToastOptions::new("x").max_visible(0)).capacity(), 1);
    }

    #[test]
    fn test_zero_configured_capacity_has_floor() {
        let config = ToastConfig {
            max_visible: 0,
            ..Default::default()
        };
        let toast = Toast::new(
            ToastId(1),
            ToastOptions::new("x"),
            &config,
            Instant::now(),
            &IdAllocator::new(),
        );
        assert_eq!(toast.capacity(), 1);
    }

    #[test]
    fn test_callbacks_become_subscribers() {
        let toast = build(
            ToastOptions::new("x")
                .on_show(|_| {})
                .on_close(|_| {})
                .on_click(|_| {}),
        );
        assert_eq!(toast.emitter.len(), 3);
    }

    #[test]
    fn test_begin_removal_only_once() {
        let mut toast = build(ToastOptions::new("x"));
        assert!(toast.advance(ToastState::Visible));
        assert!(toast.begin_removal(CloseReason::Manual));
        assert!(!toast.begin_removal(CloseReason::Timeout));
        assert_eq!(toast.close_reason(), Some(CloseReason::Manual));
    }

    #[test]
    fn test_apply_patch_recolors() {
        let mut toast = build(ToastOptions::new("x").colors("#000000", "#ffffff"));
        toast.apply(ToastPatch {
            severity: Some(Severity::Error),
            background_color: None,
            message: Some("changed".into()),
            ..Default::default()
        });

        assert_eq!(toast.content().plain_text(), "changed");
        assert_eq!(toast.severity(), Severity::Error);
        // Explicit override survives a severity change
        assert_eq!(toast.style().background.to_hex(), "#000000");
    }

    #[test]
    fn test_snapshot() {
        let now = Instant::now();
        let toast = Toast::new(
            ToastId(9),
            ToastOptions::new("hello").duration_ms(1000),
            &ToastConfig::default(),
            now,
            &IdAllocator::new(),
        );
        let snapshot = toast.snapshot(now);
        assert_eq!(snapshot.id, ToastId(9));
        assert_eq!(snapshot.text, "hello");
        assert_eq!(snapshot.remaining_ms, Some(1000));
        assert_eq!(snapshot.state, ToastState::Pending);
    }
}
