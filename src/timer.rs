//! Cancellable delayed callbacks
//!
//! The browser build schedules through `setTimeout` (see
//! `web::BrowserScheduler`). [`ManualScheduler`] runs on virtual time for
//! tests and the native runner.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A deferred task
pub type Task = Box<dyn FnOnce()>;

/// Handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Delayed-callback facility
pub trait Scheduler {
    /// Run `task` once after `delay_ms`. `None` if the task could not be
    /// scheduled (it will never run).
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId>;
    /// Cancel a pending task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, id: TimerId);
}

/// At most one pending task, tagged with what it is for.
///
/// Scheduling into an occupied slot cancels the previous task first, so an
/// older timer can never undo the effect of a newer call.
pub struct TimerSlot<T: Copy + PartialEq = ()> {
    scheduler: Rc<dyn Scheduler>,
    pending: Cell<Option<(T, TimerId)>>,
}

impl<T: Copy + PartialEq> TimerSlot<T> {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            pending: Cell::new(None),
        }
    }

    /// Cancel whatever is pending and schedule `task` in its place
    pub fn replace(&self, tag: T, delay_ms: u32, task: Task) {
        self.cancel();
        if let Some(id) = self.scheduler.schedule(delay_ms, task) {
            self.pending.set(Some((tag, id)));
        } else {
            log::warn!("Could not schedule timer ({} ms)", delay_ms);
        }
    }

    /// Cancel the pending task, if any
    pub fn cancel(&self) {
        if let Some((_, id)) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Cancel the pending task only if it was scheduled with `tag`
    pub fn cancel_if(&self, tag: T) {
        if matches!(self.pending.get(), Some((t, _)) if t == tag) {
            self.cancel();
        }
    }

    /// Tag of the pending task. May still report a task that already ran.
    pub fn pending_tag(&self) -> Option<T> {
        self.pending.get().map(|(tag, _)| tag)
    }
}

impl<T: Copy + PartialEq> Drop for TimerSlot<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct PendingTask {
    id: TimerId,
    due_ms: u64,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now_ms: u64,
    next_id: i32,
    tasks: Vec<PendingTask>,
}

/// Virtual-time scheduler. Tasks run only when [`advance`](Self::advance)
/// moves the clock past their due time.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms since creation)
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Advance virtual time, running due tasks in due order.
    ///
    /// Returns how many tasks ran. Tasks scheduled by a running task are
    /// picked up if they fall inside the window.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.state.borrow().now_ms + ms;
        let mut ran = 0;

        loop {
            // Release the borrow before running: tasks may schedule or cancel
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id.0))
                    .map(|(i, _)| i);
                due.map(|i| {
                    let task = state.tasks.remove(i);
                    state.now_ms = task.due_ms;
                    task
                })
            };

            match next {
                Some(pending) => {
                    (pending.task)();
                    ran += 1;
                }
                None => break,
            }
        }

        self.state.borrow_mut().now_ms = target;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let due_ms = state.now_ms + u64::from(delay_ms);
        state.tasks.push(PendingTask { id, due_ms, task });
        Some(id)
    }

    fn cancel(&self, id: TimerId) {
        self.state.borrow_mut().tasks.retain(|t| t.id != id);
    }
}
