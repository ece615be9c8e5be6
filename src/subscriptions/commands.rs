//! JSON-lines command protocol of the terminal host.
//!
//! One command per input line, e.g.
//!
//! ```text
//! {"cmd":"show","message":"Saved","severity":"success","duration_ms":2000}
//! {"cmd":"swipe","id":1,"dx":80}
//! {"cmd":"list"}
//! ```
//!
//! Replies and toast events are written to the output as JSON lines.

use serde::{Deserialize, Serialize};
use showme_config::ConfigPatch;
use showme_util::{EventKind, Position, Severity, ToastAction, ToastEvent, ToastId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::notifications::Client;
use crate::handlers::Message;
use crate::options::{ToastOptions, ToastPatch};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Command {
    Show(ShowCommand),
    Update {
        id: ToastId,
        #[serde(default)]
        patch: ToastPatch,
    },
    Close {
        id: ToastId,
    },
    Dismiss {
        id: ToastId,
    },
    Click {
        id: ToastId,
    },
    Action {
        id: ToastId,
        index: usize,
    },
    Suspend {
        id: ToastId,
    },
    Resume {
        id: ToastId,
    },
    Swipe {
        id: ToastId,
        dx: f32,
    },
    Config(ConfigPatch),
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowCommand {
    pub message: Option<String>,
    /// Unknown names fall back to `none`
    pub severity: Option<String>,
    pub duration_ms: Option<u32>,
    pub persistent: bool,
    pub position: Option<Position>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub corner_radius: Option<u32>,
    #[serde(alias = "animated")]
    pub animation_enabled: Option<bool>,
    pub custom_content: Option<String>,
    /// Action button labels
    pub actions: Vec<String>,
    pub max_visible: Option<u32>,
}

impl ShowCommand {
    pub fn into_options(self) -> ToastOptions {
        ToastOptions {
            message: self.message,
            severity: self
                .severity
                .map(|s| s.parse::<Severity>().unwrap_or_default()),
            duration_ms: self.duration_ms,
            persistent: self.persistent,
            position: self.position,
            background_color: self.background_color,
            text_color: self.text_color,
            corner_radius: self.corner_radius,
            animation_enabled: self.animation_enabled,
            custom_content: self.custom_content,
            actions: self.actions.into_iter().map(ToastAction::dismiss).collect(),
            max_visible: self.max_visible,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct Shown {
    id: ToastId,
}

/// Apply one command. Returns the reply line, if the command has one.
pub async fn dispatch(
    client: &Client,
    command: Command,
    events: &UnboundedSender<ToastEvent>,
) -> anyhow::Result<Option<String>> {
    let message = match command {
        Command::Show(show) => {
            let options = show
                .into_options()
                .on_show(forward(events))
                .on_click(forward(events))
                .on_close(forward(events));
            let handle = client.show(options);
            handle.on(EventKind::Action, forward(events));
            return Ok(Some(serde_json::to_string(&Shown { id: handle.id() })?));
        }
        Command::List => {
            let snapshot = client.snapshot().await?;
            return Ok(Some(serde_json::to_string(&snapshot)?));
        }
        Command::Config(patch) => Message::Config(patch),
        Command::Update { id, patch } => Message::Update(id, patch),
        Command::Close { id } => Message::Close(id),
        Command::Dismiss { id } => Message::Dismissed(id),
        Command::Click { id } => Message::Clicked(id),
        Command::Action { id, index } => Message::ActionClicked(id, index),
        Command::Suspend { id } => Message::Suspend(id),
        Command::Resume { id } => Message::Resume(id),
        Command::Swipe { id, dx } => {
            client.post(Message::GestureStart { id, x: 0.0 });
            Message::GestureEnd { id, x: dx }
        }
    };
    client.post(message);
    Ok(None)
}

fn forward(events: &UnboundedSender<ToastEvent>) -> impl FnMut(&ToastEvent) + Send + 'static {
    let events = events.clone();
    move |event: &ToastEvent| {
        _ = events.send(event.clone());
    }
}

/// Read commands from `input` until it ends, writing replies and events to
/// `output`.
pub async fn run<R, W>(client: Client, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let command = match serde_json::from_str::<Command>(line) {
                    Ok(command) => command,
                    Err(err) => {
                        tracing::warn!("Ignoring malformed command {line:?}: {err}");
                        continue;
                    }
                };
                match dispatch(&client, command, &events_tx).await {
                    Ok(Some(reply)) => write_line(&mut output, &reply).await?,
                    Ok(None) => {}
                    Err(err) => tracing::warn!("Command failed: {err}"),
                }
            }
            Some(event) = events_rx.recv() => {
                write_line(&mut output, &serde_json::to_string(&event)?).await?;
            }
        }
    }

    // A reply means every command posted before it has been handled, so its
    // events are already queued.
    if let Err(err) = client.snapshot().await {
        tracing::debug!("Not waiting for pending commands: {err}");
    }
    while let Ok(event) = events_rx.try_recv() {
        write_line(&mut output, &serde_json::to_string(&event)?).await?;
    }
    output.flush().await?;
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> anyhow::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
