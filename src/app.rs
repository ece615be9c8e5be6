// Engine overview
// ===============
//
// `Toaster` owns every piece of toast state: one `ToastQueue` per screen
// position, the defaults, the presenter and the scheduler. Everything that
// happens to a toast arrives as a `Message` (or one of the matching methods)
// and is handled to completion before the next one, so there is no locking
// and no re-entrancy.
//
// ## Removal
// - `request_removal` moves a toast to `Removing`, stops its countdown and asks
//   the presenter to hide it. The first request wins; the reason it carried is
//   the one reported in the close event.
// - `complete_removal` releases the slot and emits `close`. It runs right away
//   when the presenter reports `Exit::Done`, otherwise on `ExitFinished`.
//
// ## Capacity
// - Checked per position after every admission. Evicted toasts skip their exit
//   transition so the count never exceeds the limit, even for a moment.

use std::collections::BTreeMap;
use std::time::Duration;

use showme_config::{ConfigPatch, ToastConfig};
use showme_util::{CloseReason, EventKind, Position, SubscriptionId, ToastEvent, ToastId};

use crate::handlers::Message;
use crate::options::{ToastOptions, ToastPatch};
use crate::rendering::{Exit, Presenter};
use crate::state::timer::{self, ManualScheduler, Scheduler};
use crate::state::{IdAllocator, Toast, ToastQueue, ToastSnapshot, ToastState};

/// The toast lifecycle and queue engine
pub struct Toaster<P: Presenter, S: Scheduler = ManualScheduler> {
    config: ToastConfig,
    queues: BTreeMap<Position, ToastQueue>,
    presenter: P,
    scheduler: S,
    ids: IdAllocator,
    subscriptions: IdAllocator,
}

impl<P: Presenter, S: Scheduler> Toaster<P, S> {
    pub fn new(config: ToastConfig, presenter: P, scheduler: S) -> Self {
        Self::with_allocators(
            config,
            presenter,
            scheduler,
            IdAllocator::new(),
            IdAllocator::new(),
        )
    }

    /// Build an engine that shares its id counters with someone else, e.g. a
    /// [`Client`](crate::Client) that has to answer with an id before the
    /// engine sees the request.
    pub fn with_allocators(
        config: ToastConfig,
        presenter: P,
        scheduler: S,
        ids: IdAllocator,
        subscriptions: IdAllocator,
    ) -> Self {
        Self {
            config,
            queues: BTreeMap::new(),
            presenter,
            scheduler,
            ids,
            subscriptions,
        }
    }

    /// Create and admit a toast.
    pub fn show(&mut self, options: ToastOptions) -> ToastId {
        let id = ToastId(self.ids.next());
        self.show_with_id(id, options);
        id
    }

    pub(crate) fn show_with_id(&mut self, id: ToastId, options: ToastOptions) {
        if find_in(&mut self.queues, id).is_some() {
            tracing::warn!("{id} is already active, ignoring duplicate show");
            return;
        }

        let toast = Toast::new(
            id,
            options,
            &self.config,
            self.scheduler.now(),
            &self.subscriptions,
        );
        let position = toast.position();
        let capacity = toast.capacity();
        self.queues.entry(position).or_default().push(toast);
        self.enforce_capacity(position, id, capacity);

        let Some(toast) = find_in(&mut self.queues, id) else {
            return;
        };
        toast.advance(ToastState::Visible);
        self.presenter.show(toast);
        timer::start(toast, &mut self.scheduler);
        tracing::debug!("showing {id} at {position}");
        toast.emitter.emit(&ToastEvent::Show { id });
    }

    /// Evict the oldest toasts of `position` until it fits `capacity`.
    fn enforce_capacity(&mut self, position: Position, newcomer: ToastId, capacity: usize) {
        loop {
            let Some(queue) = self.queues.get(&position) else {
                return;
            };
            if queue.len() <= capacity {
                return;
            }
            let Some(victim) = queue.eviction_candidate(newcomer) else {
                return;
            };
            tracing::debug!("{position} is full ({capacity}), evicting {victim}");
            self.request_removal(victim, CloseReason::Eviction);
            self.complete_removal(victim);
        }
    }

    /// Handle one engine message
    pub fn update(&mut self, message: Message) {
        match message {
            Message::Timeout { id, key } => {
                let Some(toast) = find_in(&mut self.queues, id) else {
                    tracing::trace!("timer fired for unknown {id}");
                    return;
                };
                if !timer::fired(toast, key) {
                    tracing::trace!("stale timer {key:?} for {id}");
                    return;
                }
                self.request_removal(id, CloseReason::Timeout);
            }
            Message::Dismissed(id) => {
                self.dismiss(id);
            }
            Message::Close(id) => {
                self.close(id);
            }
            Message::Clicked(id) => {
                self.click(id);
            }
            Message::ActionClicked(id, index) => {
                self.invoke_action(id, index);
            }
            Message::GestureStart { id, x } => self.gesture_start(id, x),
            Message::GestureEnd { id, x } => {
                self.gesture_end(id, x);
            }
            Message::Suspend(id) => {
                self.suspend(id);
            }
            Message::Resume(id) => {
                self.resume(id);
            }
            Message::ExitFinished(id) => {
                self.complete_removal(id);
            }
            Message::Update(id, patch) => {
                self.patch(id, patch);
            }
            Message::Config(patch) => self.configure(&patch),
        }
    }

    /// Change a visible or paused toast in place.
    pub fn patch(&mut self, id: ToastId, patch: ToastPatch) -> bool {
        let Some(toast) = find_in(&mut self.queues, id) else {
            tracing::debug!("update for unknown {id} ignored");
            return false;
        };
        if !toast.state().is_live() {
            tracing::debug!("update for {id} in state {:?} ignored", toast.state());
            return false;
        }
        toast.apply(patch);
        self.presenter.refresh(toast);
        true
    }

    /// Close requested through a handle
    pub fn close(&mut self, id: ToastId) -> bool {
        self.request_removal(id, CloseReason::Programmatic)
    }

    /// Close control pressed
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        self.request_removal(id, CloseReason::Manual)
    }

    /// Start removing a toast. Returns false if it is unknown or already
    /// on its way out.
    pub fn request_removal(&mut self, id: ToastId, reason: CloseReason) -> bool {
        let Some(toast) = find_in(&mut self.queues, id) else {
            tracing::debug!("removal of unknown {id} ignored");
            return false;
        };
        if !toast.begin_removal(reason) {
            tracing::debug!("{id} is already closing, ignoring {reason}");
            return false;
        }
        timer::disarm(toast, &mut self.scheduler);

        match self.presenter.hide(toast) {
            Exit::Done => {
                self.complete_removal(id);
            }
            Exit::Pending => tracing::trace!("{id} exit transition started"),
        }
        true
    }

    /// Release the slot of a `Removing` toast and emit `close`.
    pub fn complete_removal(&mut self, id: ToastId) -> bool {
        let Some(queue) = self.queues.values_mut().find(|q| q.contains(id)) else {
            tracing::debug!("completion for unknown {id} ignored");
            return false;
        };
        if queue.get(id).map(Toast::state) != Some(ToastState::Removing) {
            tracing::debug!("completion for {id} without removal request ignored");
            return false;
        }
        let Some(mut toast) = queue.remove(id) else {
            return false;
        };

        toast.advance(ToastState::Removed);
        self.presenter.detach(id);
        let reason = toast.close_reason().unwrap_or(CloseReason::Programmatic);
        tracing::debug!("{id} closed ({reason})");
        toast.emitter.emit(&ToastEvent::Close { id, reason });
        true
    }

    /// Hold the countdown of a visible toast
    pub fn suspend(&mut self, id: ToastId) -> bool {
        find_in(&mut self.queues, id).is_some_and(|t| timer::pause(t, &mut self.scheduler))
    }

    pub fn resume(&mut self, id: ToastId) -> bool {
        find_in(&mut self.queues, id).is_some_and(|t| timer::resume(t, &mut self.scheduler))
    }

    /// Body click. Emits `click`, the toast stays.
    pub fn click(&mut self, id: ToastId) -> bool {
        match find_in(&mut self.queues, id) {
            Some(toast) if toast.state().is_live() => {
                toast.emitter.emit(&ToastEvent::Click { id });
                true
            }
            _ => false,
        }
    }

    /// Run action `index`, emit `action`, then remove the toast.
    pub fn invoke_action(&mut self, id: ToastId, index: usize) -> bool {
        let Some(toast) = find_in(&mut self.queues, id) else {
            return false;
        };
        if !toast.state().is_live() {
            return false;
        }
        let Some(action) = toast.action_mut(index) else {
            tracing::debug!("{id} has no action {index}");
            return false;
        };
        action.invoke();
        let label = action.label.clone();
        toast.emitter.emit(&ToastEvent::Action { id, index, label });
        self.request_removal(id, CloseReason::Action)
    }

    pub fn gesture_start(&mut self, id: ToastId, x: f32) {
        if let Some(toast) = find_in(&mut self.queues, id) {
            if toast.state().is_live() {
                toast.gesture_origin = Some(x);
            }
        }
    }

    /// Finish a gesture. Travel of at least the swipe threshold dismisses.
    pub fn gesture_end(&mut self, id: ToastId, x: f32) -> bool {
        let Some(origin) = find_in(&mut self.queues, id).and_then(|t| t.gesture_origin.take())
        else {
            return false;
        };
        let travel = (x - origin).abs();
        if travel.is_nan() || travel < self.config.swipe_threshold_px as f32 {
            tracing::trace!("{id} swipe of {travel}px below threshold");
            return false;
        }
        self.request_removal(id, CloseReason::Gesture)
    }

    /// A whole horizontal swipe of `dx` pixels
    pub fn swipe(&mut self, id: ToastId, dx: f32) -> bool {
        self.gesture_start(id, 0.0);
        self.gesture_end(id, dx)
    }

    /// Subscribe to events of a toast still in a queue.
    pub fn on(
        &mut self,
        id: ToastId,
        kind: EventKind,
        callback: impl FnMut(&ToastEvent) + Send + 'static,
    ) -> Option<SubscriptionId> {
        let subscription = SubscriptionId(self.subscriptions.next());
        self.subscribe(id, subscription, kind, Box::new(callback))
            .then_some(subscription)
    }

    pub(crate) fn subscribe(
        &mut self,
        id: ToastId,
        subscription: SubscriptionId,
        kind: EventKind,
        callback: showme_util::Callback,
    ) -> bool {
        let Some(toast) = find_in(&mut self.queues, id) else {
            tracing::debug!("subscription to unknown {id} dropped");
            return false;
        };
        toast.emitter.subscribe(subscription, kind, callback);
        true
    }

    pub fn off(&mut self, id: ToastId, subscription: SubscriptionId) -> bool {
        find_in(&mut self.queues, id).is_some_and(|t| t.emitter.unsubscribe(subscription))
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.queues.values().find_map(|q| q.get(id))
    }

    /// `None` once the toast is removed
    pub fn state(&self, id: ToastId) -> Option<ToastState> {
        self.get(id).map(Toast::state)
    }

    /// Toasts at `position`, oldest first
    pub fn active(&self, position: Position) -> impl Iterator<Item = &Toast> {
        self.queues.get(&position).into_iter().flat_map(ToastQueue::iter)
    }

    pub fn len(&self, position: Position) -> usize {
        self.queues.get(&position).map_or(0, ToastQueue::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(ToastQueue::is_empty)
    }

    pub fn snapshot(&self) -> Vec<ToastSnapshot> {
        let now = self.scheduler.now();
        self.queues
            .values()
            .flat_map(ToastQueue::iter)
            .map(|t| t.snapshot(now))
            .collect()
    }

    /// Merge into the defaults. Active toasts keep what they were built with.
    pub fn configure(&mut self, patch: &ConfigPatch) {
        self.config.merge(patch);
        tracing::debug!("defaults updated: {:?}", self.config);
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<P: Presenter> Toaster<P, ManualScheduler> {
    /// Move simulated time forward, delivering every fire due on the way in
    /// deadline order.
    pub fn advance(&mut self, by: Duration) {
        let limit = self.scheduler.elapsed() + by;
        while let Some((id, key)) = self.scheduler.pop_due(limit) {
            self.update(Message::Timeout { id, key });
        }
        self.scheduler.set_elapsed(limit);
    }
}

fn find_in(queues: &mut BTreeMap<Position, ToastQueue>, id: ToastId) -> Option<&mut Toast> {
    queues.values_mut().find_map(|q| q.get_mut(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::{Call, RecordingPresenter};
    use showme_util::ToastAction;
    use std::sync::{Arc, Mutex};

    type Engine = Toaster<RecordingPresenter>;

    fn engine() -> Engine {
        Toaster::new(
            ToastConfig::default(),
            RecordingPresenter::new(),
            ManualScheduler::new(),
        )
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn closes(log: &Arc<Mutex<Vec<ToastEvent>>>) -> impl FnMut(&ToastEvent) + Send + 'static {
        let log = log.clone();
        move |event: &ToastEvent| log.lock().unwrap().push(event.clone())
    }

    #[test]
    fn test_show_makes_visible() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("hi"));

        assert_eq!(engine.state(id), Some(ToastState::Visible));
        assert_eq!(engine.presenter().calls, vec![Call::Show(id)]);
        assert_eq!(engine.len(Position::TopRight), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut engine = engine();
        let a = engine.show(ToastOptions::new("a"));
        engine.close(a);
        let b = engine.show(ToastOptions::new("b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_capacity_invariant() {
        let mut engine = engine();
        for i in 0..20 {
            engine.show(ToastOptions::new(format!("toast {i}")));
            assert!(engine.len(Position::TopRight) <= 5);
        }
        assert_eq!(engine.len(Position::TopRight), 5);
    }

    #[test]
    fn test_capacity_invariant_with_exit_transitions() {
        let mut engine = Toaster::new(
            ToastConfig::default(),
            RecordingPresenter::animated(),
            ManualScheduler::new(),
        );
        for i in 0..3 {
            let id = engine.show(ToastOptions::new(format!("{i}")).max_visible(2));
            // leave it mid-exit
            engine.dismiss(id);
            assert!(engine.len(Position::TopRight) <= 2);
        }
    }

    #[test]
    fn test_fifo_eviction() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = engine.show(ToastOptions::new("A").max_visible(2).on_close(closes(&log)));
        let b = engine.show(ToastOptions::new("B").max_visible(2));
        let c = engine.show(ToastOptions::new("C").max_visible(2));

        assert_eq!(engine.state(a), None);
        let remaining: Vec<_> = engine.active(Position::TopRight).map(Toast::id).collect();
        assert_eq!(remaining, vec![b, c]);
        assert_eq!(
            *log.lock().unwrap(),
            vec![ToastEvent::Close {
                id: a,
                reason: CloseReason::Eviction
            }]
        );
    }

    #[test]
    fn test_eviction_ignores_severity() {
        let mut engine = engine();
        let error = engine.show(
            ToastOptions::new("err")
                .severity(showme_util::Severity::Error)
                .max_visible(1),
        );
        let info = engine.show(ToastOptions::new("info").max_visible(1));

        assert_eq!(engine.state(error), None);
        assert_eq!(engine.state(info), Some(ToastState::Visible));
    }

    #[test]
    fn test_positions_have_separate_queues() {
        let mut engine = engine();
        engine.show(ToastOptions::new("a").max_visible(1));
        let b = engine.show(
            ToastOptions::new("b")
                .position(Position::BottomLeft)
                .max_visible(1),
        );
        assert_eq!(engine.len(Position::TopRight), 1);
        assert_eq!(engine.len(Position::BottomLeft), 1);
        assert_eq!(engine.state(b), Some(ToastState::Visible));
    }

    #[test]
    fn test_timeout_removes_once() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(ToastOptions::new("x").duration_ms(1000).on_close(closes(&log)));

        engine.advance(ms(999));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
        engine.advance(ms(1));
        assert_eq!(engine.state(id), None);
        engine.advance(ms(10_000));

        assert_eq!(
            *log.lock().unwrap(),
            vec![ToastEvent::Close {
                id,
                reason: CloseReason::Timeout
            }]
        );
    }

    #[test]
    fn test_pause_resume_conserves_time() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x").duration_ms(5000));

        engine.advance(ms(2000));
        assert!(engine.suspend(id));
        assert_eq!(engine.state(id), Some(ToastState::Paused));
        let now = engine.scheduler().now();
        assert_eq!(engine.get(id).unwrap().remaining(now), Some(ms(3000)));

        // paused time does not count
        engine.advance(ms(60_000));
        assert_eq!(engine.state(id), Some(ToastState::Paused));

        assert!(engine.resume(id));
        engine.advance(ms(2999));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
        engine.advance(ms(1));
        assert_eq!(engine.state(id), None);
    }

    #[test]
    fn test_many_pause_cycles() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x").duration_ms(5000));
        for _ in 0..9 {
            engine.advance(ms(500));
            engine.suspend(id);
            engine.advance(ms(1000));
            engine.resume(id);
        }
        // 4500 ms used
        engine.advance(ms(499));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
        engine.advance(ms(1));
        assert_eq!(engine.state(id), None);
    }

    #[test]
    fn test_suspend_twice_is_noop() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));
        assert!(engine.suspend(id));
        assert!(!engine.suspend(id));
        assert!(engine.resume(id));
        assert!(!engine.resume(id));
    }

    #[test]
    fn test_persistent_never_expires() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x").persistent());
        engine.advance(ms(24 * 60 * 60 * 1000));

        assert_eq!(engine.state(id), Some(ToastState::Visible));
        assert!(!engine.suspend(id), "persistent toasts cannot be paused");
        assert_eq!(engine.scheduler().pending(), 0);
    }

    #[test]
    fn test_close_then_no_timeout() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(ToastOptions::new("Saved").duration_ms(1000).on_close(closes(&log)));

        assert!(engine.close(id));
        assert!(!engine.close(id));
        engine.advance(ms(5000));

        assert_eq!(
            *log.lock().unwrap(),
            vec![ToastEvent::Close {
                id,
                reason: CloseReason::Programmatic
            }]
        );
        assert_eq!(engine.scheduler().pending(), 0);
    }

    #[test]
    fn test_first_reason_wins_during_exit() {
        let mut engine = Toaster::new(
            ToastConfig::default(),
            RecordingPresenter::animated(),
            ManualScheduler::new(),
        );
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(ToastOptions::new("x").on_close(closes(&log)));

        assert!(engine.dismiss(id));
        assert_eq!(engine.state(id), Some(ToastState::Removing));
        assert!(!engine.swipe(id, 200.0));
        assert!(!engine.close(id));
        engine.advance(ms(10_000));

        engine.update(Message::ExitFinished(id));
        engine.update(Message::ExitFinished(id));
        assert_eq!(engine.state(id), None);
        assert_eq!(
            *log.lock().unwrap(),
            vec![ToastEvent::Close {
                id,
                reason: CloseReason::Manual
            }]
        );
        assert_eq!(engine.presenter().count(Call::Hide(id)), 1);
        assert_eq!(engine.presenter().count(Call::Detach(id)), 1);
    }

    #[test]
    fn test_swipe_threshold() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));

        assert!(!engine.swipe(id, 49.0));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
        assert!(engine.swipe(id, -51.0));
        assert_eq!(engine.state(id), None);
    }

    #[test]
    fn test_swipe_with_invalid_travel() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x").persistent());

        assert!(!engine.swipe(id, f32::NAN));
        engine.update(Message::GestureStart { id, x: 10.0 });
        engine.update(Message::GestureEnd { id, x: f32::NAN });
        engine.update(Message::GestureStart { id, x: f32::NAN });
        engine.update(Message::GestureEnd { id, x: 500.0 });
        assert_eq!(engine.state(id), Some(ToastState::Visible));

        assert!(engine.swipe(id, f32::INFINITY));
        assert_eq!(engine.state(id), None);
    }

    #[test]
    fn test_swipe_exactly_at_threshold_dismisses() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));
        assert!(engine.swipe(id, 50.0));
    }

    #[test]
    fn test_gesture_end_without_start() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));
        assert!(!engine.gesture_end(id, 500.0));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
    }

    #[test]
    fn test_update_only_when_live() {
        let mut engine = Toaster::new(
            ToastConfig::default(),
            RecordingPresenter::animated(),
            ManualScheduler::new(),
        );
        let id = engine.show(ToastOptions::new("before"));

        assert!(engine.patch(id, ToastPatch::message("after")));
        assert_eq!(engine.get(id).unwrap().content().plain_text(), "after");
        assert_eq!(engine.presenter().count(Call::Refresh(id)), 1);

        engine.dismiss(id);
        assert!(!engine.patch(id, ToastPatch::message("late")));
        assert_eq!(engine.get(id).unwrap().content().plain_text(), "after");
    }

    #[test]
    fn test_update_keeps_timer_and_position() {
        let mut engine = engine();
        let a = engine.show(ToastOptions::new("a").duration_ms(1000));
        let b = engine.show(ToastOptions::new("b"));

        engine.advance(ms(600));
        engine.patch(a, ToastPatch::message("a2"));
        let order: Vec<_> = engine.active(Position::TopRight).map(Toast::id).collect();
        assert_eq!(order, vec![a, b]);

        engine.advance(ms(400));
        assert_eq!(engine.state(a), None);
    }

    #[test]
    fn test_click_does_not_remove() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(ToastOptions::new("x").on_click(closes(&log)));

        assert!(engine.click(id));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
        assert_eq!(*log.lock().unwrap(), vec![ToastEvent::Click { id }]);
    }

    #[test]
    fn test_action_runs_then_removes() {
        let mut engine = engine();
        let ran = Arc::new(Mutex::new(0));
        let counter = ran.clone();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(
            ToastOptions::new("deleted")
                .action(ToastAction::new("Undo", move || *counter.lock().unwrap() += 1))
                .on_close(closes(&log)),
        );
        engine.on(id, EventKind::Action, closes(&log));

        assert!(engine.invoke_action(id, 0));
        assert!(!engine.invoke_action(id, 0));

        assert_eq!(*ran.lock().unwrap(), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                ToastEvent::Action {
                    id,
                    index: 0,
                    label: "Undo".into()
                },
                ToastEvent::Close {
                    id,
                    reason: CloseReason::Action
                },
            ]
        );
    }

    #[test]
    fn test_unknown_action_index_is_noop() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));
        assert!(!engine.invoke_action(id, 3));
        assert_eq!(engine.state(id), Some(ToastState::Visible));
    }

    #[test]
    fn test_on_and_off() {
        let mut engine = engine();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = engine.show(ToastOptions::new("x"));

        let first = engine.on(id, EventKind::Click, closes(&log)).unwrap();
        engine.on(id, EventKind::Click, closes(&log)).unwrap();
        assert!(engine.off(id, first));
        assert!(!engine.off(id, first));

        engine.click(id);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let mut engine = engine();
        let id = engine.show(ToastOptions::new("x"));
        engine.close(id);
        let calls = engine.presenter().calls.len();

        assert!(!engine.close(id));
        assert!(!engine.dismiss(id));
        assert!(!engine.patch(id, ToastPatch::message("y")));
        assert!(!engine.click(id));
        assert!(!engine.suspend(id));
        assert!(!engine.resume(id));
        assert!(!engine.complete_removal(id));
        assert!(engine.on(id, EventKind::Close, |_| {}).is_none());
        engine.update(Message::ExitFinished(id));

        assert_eq!(engine.presenter().calls.len(), calls);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_config_affects_later_toasts_only() {
        let mut engine = engine();
        let early = engine.show(ToastOptions::new("early"));
        engine.update(Message::Config(ConfigPatch {
            default_duration_ms: Some(100),
            default_position: Some(Position::BottomRight),
            ..Default::default()
        }));
        let late = engine.show(ToastOptions::new("late"));

        assert_eq!(engine.get(early).unwrap().position(), Position::TopRight);
        assert_eq!(engine.get(late).unwrap().position(), Position::BottomRight);
        engine.advance(ms(100));
        assert_eq!(engine.state(late), None);
        assert_eq!(engine.state(early), Some(ToastState::Visible));
    }

    #[test]
    fn test_per_call_options_do_not_touch_defaults() {
        let mut engine = engine();
        engine.show(
            ToastOptions::new("x")
                .duration_ms(1)
                .position(Position::TopLeft)
                .max_visible(1),
        );
        assert_eq!(engine.config(), &ToastConfig::default());
    }

    #[test]
    fn test_snapshot_lists_all_positions() {
        let mut engine = engine();
        engine.show(ToastOptions::new("a"));
        engine.show(ToastOptions::new("b").position(Position::BottomLeft));

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|s| s.state == ToastState::Visible));
    }
}
