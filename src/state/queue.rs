use std::collections::VecDeque;

use showme_util::ToastId;

use super::toast::{Toast, ToastState};
use crate::constants::*;

/// Active toasts of one position, oldest first.
///
/// Only the engine mutates a queue; presenters and gesture handlers go through
/// removal requests.
#[derive(Debug)]
pub struct ToastQueue {
    cards: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self {
            cards: VecDeque::with_capacity(INITIAL_QUEUE_CAPACITY),
        }
    }

    /// Toasts in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: ToastId) -> bool {
        self.cards.iter().any(|t| t.id() == id)
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.cards.iter().find(|t| t.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.cards.iter_mut().find(|t| t.id() == id)
    }

    pub(crate) fn push(&mut self, toast: Toast) {
        self.cards.push_back(toast);
    }

    pub(crate) fn remove(&mut self, id: ToastId) -> Option<Toast> {
        let pos = self.cards.iter().position(|t| t.id() == id)?;
        let toast = self.cards.remove(pos);
        if self.cards.is_empty() {
            self.cards.shrink_to(IDLE_QUEUE_CAPACITY);
        }
        toast
    }

    /// Pick the toast to evict when the queue is over capacity.
    ///
    /// Recomputed on every call: the oldest member that is not already being
    /// removed, never `newcomer`. If every other member is mid-removal, the
    /// oldest of those is returned so its slot can be released early.
    pub fn eviction_candidate(&self, newcomer: ToastId) -> Option<ToastId> {
        self.cards
            .iter()
            .find(|t| t.id() != newcomer && !t.state().is_closing())
            .or_else(|| {
                self.cards
                    .iter()
                    .find(|t| t.state() == ToastState::Removing)
            })
            .map(Toast::id)
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}
