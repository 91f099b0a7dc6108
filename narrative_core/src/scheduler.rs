//! Virtual-time scheduler for deferred narration.
//!
//! Tasks are never run by the scheduler itself; the engine drains the due ones
//! on every tick and decides whether they are still relevant by comparing the
//! epoch captured at scheduling time against its current epoch.

use std::time::Duration;

/// Identifier of a scheduled task, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A task waiting for its due time.
#[derive(Debug, Clone)]
pub struct ScheduledTask<T> {
    pub id: TaskId,
    /// Virtual time at which the task becomes due.
    pub due: Duration,
    /// Engine epoch when the task was scheduled.
    pub epoch: u64,
    pub task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to become due after `delay`.
    pub fn schedule(&mut self, delay: Duration, epoch: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(ScheduledTask {
            id,
            due: self.now + delay,
            epoch,
            task,
        });
        id
    }

    /// Remove a pending task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Time until the next task is due, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    /// Advance virtual time and take every task that is now due, ordered by
    /// due time then scheduling order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduledTask<T>> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;

        due.sort_by_key(|t| (t.due, t.id.0));
        due
    }
}
