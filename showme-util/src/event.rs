use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CloseReason, ToastId};

/// Handle returned by `on`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Lifecycle events a subscriber can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The presenter was told to show the toast
    Show,
    /// The toast reached its terminal state
    Close,
    /// The toast body was clicked
    Click,
    /// One of the toast's action buttons was pressed
    Action,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Show => "show",
            EventKind::Close => "close",
            EventKind::Click => "click",
            EventKind::Action => "action",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "show" => Ok(EventKind::Show),
            "close" => Ok(EventKind::Close),
            "click" => Ok(EventKind::Click),
            "action" => Ok(EventKind::Action),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown toast event '{}'", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

/// Payload delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ToastEvent {
    Show { id: ToastId },
    Close { id: ToastId, reason: CloseReason },
    Click { id: ToastId },
    Action { id: ToastId, index: usize, label: String },
}

impl ToastEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ToastEvent::Show { .. } => EventKind::Show,
            ToastEvent::Close { .. } => EventKind::Close,
            ToastEvent::Click { .. } => EventKind::Click,
            ToastEvent::Action { .. } => EventKind::Action,
        }
    }

    pub fn id(&self) -> ToastId {
        match self {
            ToastEvent::Show { id }
            | ToastEvent::Close { id, .. }
            | ToastEvent::Click { id }
            | ToastEvent::Action { id, .. } => *id,
        }
    }
}

/// Subscriber callback
pub type Callback = Box<dyn FnMut(&ToastEvent) + Send>;
