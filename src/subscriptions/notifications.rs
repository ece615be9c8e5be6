use std::fmt;

use showme_config::{ConfigPatch, ToastConfig};
use showme_util::{Callback, EventKind, SubscriptionId, ToastEvent, ToastId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;

use super::timers::TokioScheduler;
use crate::app::Toaster;
use crate::handlers::Message;
use crate::options::{ToastOptions, ToastPatch};
use crate::rendering::Presenter;
use crate::state::{IdAllocator, ToastSnapshot};

/// Requests accepted by the service loop
pub enum Input {
    Show {
        id: ToastId,
        options: ToastOptions,
    },
    Subscribe {
        id: ToastId,
        subscription: SubscriptionId,
        kind: EventKind,
        callback: Callback,
    },
    Unsubscribe {
        id: ToastId,
        subscription: SubscriptionId,
    },
    Message(Message),
    Snapshot {
        tx: oneshot::Sender<Vec<ToastSnapshot>>,
    },
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Show { id, options } => f
                .debug_struct("Show")
                .field("id", id)
                .field("options", options)
                .finish(),
            Input::Subscribe {
                id,
                subscription,
                kind,
                ..
            } => f
                .debug_struct("Subscribe")
                .field("id", id)
                .field("subscription", subscription)
                .field("kind", kind)
                .finish_non_exhaustive(),
            Input::Unsubscribe { id, subscription } => f
                .debug_struct("Unsubscribe")
                .field("id", id)
                .field("subscription", subscription)
                .finish(),
            Input::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Input::Snapshot { .. } => f.debug_struct("Snapshot").finish_non_exhaustive(),
        }
    }
}

/// Create the toast service and a client for it.
///
/// `make_presenter` receives a weak sender so a presenter with exit
/// transitions can report [`Message::ExitFinished`] without keeping the
/// service alive. The service stops once every [`Client`] is dropped.
pub fn service<P, F>(config: ToastConfig, make_presenter: F) -> (Client, Service<P>)
where
    P: Presenter,
    F: FnOnce(WeakUnboundedSender<Input>) -> P,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let ids = IdAllocator::new();
    let subscriptions = IdAllocator::new();

    let presenter = make_presenter(tx.downgrade());
    let scheduler = TokioScheduler::new(tx.downgrade());
    let toaster = Toaster::with_allocators(
        config,
        presenter,
        scheduler,
        ids.clone(),
        subscriptions.clone(),
    );

    (
        Client {
            tx,
            ids,
            subscriptions,
        },
        Service { toaster, rx },
    )
}

/// Owns the engine and drains the input channel
pub struct Service<P: Presenter> {
    toaster: Toaster<P, TokioScheduler>,
    rx: UnboundedReceiver<Input>,
}

impl<P: Presenter> Service<P> {
    pub async fn run(mut self) {
        while let Some(input) = self.rx.recv().await {
            self.handle(input);
        }
        tracing::debug!("all toast clients dropped, stopping");
    }

    pub fn toaster(&self) -> &Toaster<P, TokioScheduler> {
        &self.toaster
    }

    fn handle(&mut self, input: Input) {
        tracing::trace!("{input:?}");
        match input {
            Input::Show { id, options } => self.toaster.show_with_id(id, options),
            Input::Subscribe {
                id,
                subscription,
                kind,
                callback,
            } => {
                self.toaster.subscribe(id, subscription, kind, callback);
            }
            Input::Unsubscribe { id, subscription } => {
                self.toaster.off(id, subscription);
            }
            Input::Message(message) => self.toaster.update(message),
            Input::Snapshot { tx } => {
                _ = tx.send(self.toaster.snapshot());
            }
        }
    }
}

/// Cheap, cloneable entry point to a running [`Service`]
#[derive(Debug, Clone)]
pub struct Client {
    tx: UnboundedSender<Input>,
    ids: IdAllocator,
    subscriptions: IdAllocator,
}

impl Client {
    /// Queue a toast. The id is assigned right away.
    pub fn show(&self, options: ToastOptions) -> Handle {
        let id = ToastId(self.ids.next());
        self.send(Input::Show { id, options });
        self.handle(id)
    }

    /// Handle for a toast shown earlier, e.g. from an id on the wire
    pub fn handle(&self, id: ToastId) -> Handle {
        Handle {
            id,
            client: self.clone(),
        }
    }

    /// Merge into the defaults used by later toasts
    pub fn config(&self, patch: ConfigPatch) {
        self.post(Message::Config(patch));
    }

    /// Deliver a raw engine message, e.g. from a host's input handling.
    pub fn post(&self, message: Message) {
        self.send(Input::Message(message));
    }

    pub async fn snapshot(&self) -> anyhow::Result<Vec<ToastSnapshot>> {
        let (tx, rx) = oneshot::channel();
        if !self.send(Input::Snapshot { tx }) {
            anyhow::bail!("toast service is not running");
        }
        Ok(rx.await?)
    }

    fn send(&self, input: Input) -> bool {
        match self.tx.send(input) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("toast service is gone, dropping {:?}", err.0);
                false
            }
        }
    }
}

/// Returned by [`Client::show`]. Every call is a no-op once the toast is gone.
#[derive(Debug, Clone)]
pub struct Handle {
    id: ToastId,
    client: Client,
}

impl Handle {
    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn update(&self, patch: ToastPatch) {
        self.client.post(Message::Update(self.id, patch));
    }

    pub fn close(&self) {
        self.client.post(Message::Close(self.id));
    }

    pub fn on(
        &self,
        kind: EventKind,
        callback: impl FnMut(&ToastEvent) + Send + 'static,
    ) -> SubscriptionId {
        let subscription = SubscriptionId(self.client.subscriptions.next());
        self.client.send(Input::Subscribe {
            id: self.id,
            subscription,
            kind,
            callback: Box::new(callback),
        });
        subscription
    }

    pub fn off(&self, subscription: SubscriptionId) {
        self.client.send(Input::Unsubscribe {
            id: self.id,
            subscription,
        });
    }

    /// Hold the countdown, e.g. while the pointer is over the toast
    pub fn suspend(&self) {
        self.client.post(Message::Suspend(self.id));
    }

    pub fn resume(&self) {
        self.client.post(Message::Resume(self.id));
    }
}
