use std::io::Write;
use std::time::Duration;

use showme_util::{Content, Severity, ToastId};
use tokio::sync::mpsc::WeakUnboundedSender;

use super::{Exit, Presenter};
use crate::constants::*;
use crate::handlers::Message;
use crate::state::Toast;
use crate::subscriptions::notifications::Input;

/// Render a toast as a single text line
///
/// `[top-right] #3 warning: Disk almost full [Clean up] [Later] ×`
pub fn render_card(toast: &Toast) -> String {
    let mut text = toast.content().plain_text().replace('\n', " ");
    if text.chars().count() > CARD_MESSAGE_MAX_LENGTH {
        text = text
            .chars()
            .take(CARD_MESSAGE_MAX_LENGTH - 3)
            .collect::<String>();
        text.push_str("...");
    }

    let mut card = format!("[{}] {}", toast.position(), toast.id());
    match toast.severity() {
        Severity::None => card.push(':'),
        severity => card.push_str(&format!(" {severity}:")),
    }
    if !text.is_empty() {
        card.push(' ');
        card.push_str(&text);
    }
    if matches!(toast.content(), Content::Markup(_)) {
        card.push_str(" (rich)");
    }

    for action in toast.actions().iter().take(MAX_VISIBLE_ACTIONS) {
        card.push_str(&format!(" [{}]", action.label));
    }
    if toast.actions().len() > MAX_VISIBLE_ACTIONS {
        card.push_str(&format!(" (+{})", toast.actions().len() - MAX_VISIBLE_ACTIONS));
    }

    card.push(' ');
    card.push_str(CLOSE_GLYPH);
    card
}

/// Presenter for terminals: one line per change, written to `W`.
///
/// Exit transitions are simulated with a timer when the toast asks for
/// animation and a runtime is available; otherwise hiding is immediate.
pub struct TerminalPresenter<W: Write> {
    out: W,
    transitions: Option<(WeakUnboundedSender<Input>, Duration)>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            transitions: None,
        }
    }

    pub fn with_exit_transitions(mut self, tx: WeakUnboundedSender<Input>, after: Duration) -> Self {
        self.transitions = Some((tx, after));
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, tag: &str, body: &str) {
        if let Err(err) = writeln!(self.out, "{tag:>7} {body}") {
            tracing::warn!("Failed to write toast: {err}");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show(&mut self, toast: &Toast) {
        let card = render_card(toast);
        self.line("show", &card);
    }

    fn hide(&mut self, toast: &Toast) -> Exit {
        let id = toast.id();
        let reason = toast.close_reason().map_or("closed", |r| r.as_str());
        self.line("hide", &format!("{id} ({reason})"));

        let Some((tx, after)) = self.transitions.as_ref().filter(|_| toast.is_animated()) else {
            return Exit::Done;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, skipping exit transition of {id}");
            return Exit::Done;
        };

        let tx = tx.clone();
        let after = *after;
        runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(tx) = tx.upgrade() {
                _ = tx.send(Input::Message(Message::ExitFinished(id)));
            }
        });
        Exit::Pending
    }

    fn refresh(&mut self, toast: &Toast) {
        let card = render_card(toast);
        self.line("update", &card);
    }

    fn detach(&mut self, id: ToastId) {
        self.line("gone", &id.to_string());
    }
}
