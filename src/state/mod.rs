pub mod emitter;
pub mod queue;
pub mod timer;
pub mod toast;

pub use emitter::Emitter;
pub use queue::ToastQueue;
pub use timer::{Countdown, ManualScheduler, Scheduler, TimerKey};
pub use toast::{Toast, ToastSnapshot, ToastState};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id source, starting at 1. Ids are never reused.
///
/// Clones share the counter, so a client can hand out ids before the
/// engine has seen the request.
#[derive(Debug, Clone)]
pub struct IdAllocator(Arc<AtomicU64>);

impl IdAllocator {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(1)))
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
