use std::collections::HashMap;
use std::time::{Duration, Instant};

use showme_util::ToastId;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio::task::AbortHandle;

use super::notifications::Input;
use crate::handlers::Message;
use crate::state::{Scheduler, TimerKey};

/// Scheduler backed by tokio timers.
///
/// Every fire is a task that sleeps and then posts a timeout message back to
/// the service. Cancelling aborts the task. Must be used inside a runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tx: WeakUnboundedSender<Input>,
    next_key: u64,
    tasks: HashMap<TimerKey, AbortHandle>,
}

impl TokioScheduler {
    pub fn new(tx: WeakUnboundedSender<Input>) -> Self {
        Self {
            tx,
            next_key: 0,
            tasks: HashMap::new(),
        }
    }

    /// Timers that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn schedule(&mut self, id: ToastId, after: Duration) -> TimerKey {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_key += 1;
        let key = TimerKey(self.next_key);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(tx) = tx.upgrade() {
                _ = tx.send(Input::Message(Message::Timeout { id, key }));
            }
        });
        self.tasks.insert(key, task.abort_handle());
        key
    }

    fn cancel(&mut self, key: TimerKey) {
        if let Some(task) = self.tasks.remove(&key) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fire_posts_timeout() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx.downgrade());
        let start = scheduler.now();

        let key = scheduler.schedule(ToastId(7), Duration::from_millis(1500));

        match rx.recv().await {
            Some(Input::Message(Message::Timeout { id, key: fired })) => {
                assert_eq!(id, ToastId(7));
                assert_eq!(fired, key);
            }
            other => panic!("unexpected input {other:?}"),
        }
        assert!(scheduler.now() - start >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx.downgrade());

        let key = scheduler.schedule(ToastId(1), Duration::from_millis(100));
        scheduler.cancel(key);
        scheduler.cancel(key);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(rx.try_recv().is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_fresh() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx.downgrade());

        let a = scheduler.schedule(ToastId(1), Duration::from_secs(1));
        let b = scheduler.schedule(ToastId(1), Duration::from_secs(1));
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
    }
}
