//! Toast notifications without the bookkeeping.
//!
//! [`Toaster`] is the engine: per-position queues with a capacity limit,
//! pausable countdowns and exactly-once removal. It is driven synchronously,
//! either with real timers inside [`Service`] or with [`ManualScheduler`] for
//! simulated time. Drawing is left to a [`Presenter`].

pub mod app;
mod constants;
pub mod handlers;
pub mod options;
pub mod overlay;
pub mod rendering;
pub mod state;
pub mod subscriptions;

pub use app::Toaster;
pub use handlers::Message;
pub use options::{ToastOptions, ToastPatch};
pub use rendering::{Exit, Presenter, RecordingPresenter, TerminalPresenter};
pub use state::{ManualScheduler, Scheduler, TimerKey, Toast, ToastSnapshot, ToastState};
pub use subscriptions::{Client, Handle, Service, TokioScheduler, service};

pub use showme_config::{ConfigPatch, ToastConfig};
pub use showme_util::{
    CloseReason, Content, EventKind, Position, Severity, SubscriptionId, ToastAction, ToastEvent,
    ToastId,
};
