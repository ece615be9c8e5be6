//! Presentation adapters.
//!
//! The engine never draws anything itself; it tells a [`Presenter`] when a
//! toast appears, changes or leaves, and the presenter reports back whether
//! its exit transition already finished.

pub mod cards;

pub use cards::{TerminalPresenter, render_card};

use showme_util::ToastId;

use crate::state::Toast;

/// Outcome of [`Presenter::hide`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exit {
    /// The toast is gone, release its slot now
    #[default]
    Done,
    /// An exit transition is running. The presenter must later deliver
    /// [`Message::ExitFinished`](crate::handlers::Message::ExitFinished).
    Pending,
}

pub trait Presenter {
    fn show(&mut self, toast: &Toast);

    fn hide(&mut self, toast: &Toast) -> Exit;

    /// The toast changed in place
    fn refresh(&mut self, toast: &Toast);

    /// The slot was released. Called once per toast, after any exit transition.
    fn detach(&mut self, _id: ToastId) {}
}

/// Call log entry of a [`RecordingPresenter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Show(ToastId),
    Hide(ToastId),
    Refresh(ToastId),
    Detach(ToastId),
}

/// Presenter that only records what it was asked to do.
///
/// Used by hosts that render elsewhere and by tests.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Vec<Call>,
    /// Returned from every `hide`
    pub exit: Exit,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter whose exit transitions finish only on
    /// [`Message::ExitFinished`](crate::handlers::Message::ExitFinished).
    pub fn animated() -> Self {
        Self {
            calls: Vec::new(),
            exit: Exit::Pending,
        }
    }

    /// Ids currently shown, in show order
    pub fn shown(&self) -> Vec<ToastId> {
        let mut shown = Vec::new();
        for call in &self.calls {
            match *call {
                Call::Show(id) => shown.push(id),
                Call::Detach(id) => shown.retain(|s| *s != id),
                _ => {}
            }
        }
        shown
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Presenter for RecordingPresenter {
    fn show(&mut self, toast: &Toast) {
        self.calls.push(Call::Show(toast.id()));
    }

    fn hide(&mut self, toast: &Toast) -> Exit {
        self.calls.push(Call::Hide(toast.id()));
        self.exit
    }

    fn refresh(&mut self, toast: &Toast) {
        self.calls.push(Call::Refresh(toast.id()));
    }

    fn detach(&mut self, id: ToastId) {
        self.calls.push(Call::Detach(id));
    }
}
