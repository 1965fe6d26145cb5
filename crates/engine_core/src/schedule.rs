//! Deferred tasks fired by simulation time.
//!
//! There is no async runtime behind this: the driver asks for the due tasks
//! once per tick and runs them on the same thread.

/// One pending task and the simulation time it becomes due.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask<T> {
    pub fire_at: f64,
    pub task: T,
    seq: u64,
}

/// Queue of tasks waiting for a fire time.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<ScheduledTask<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire at absolute simulation time `fire_at`.
    pub fn schedule_at(&mut self, fire_at: f64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(ScheduledTask { fire_at, task, seq });
    }

    /// Queue `task` to fire `delay` seconds after `now`.
    pub fn schedule_after(&mut self, now: f64, delay: f32, task: T) {
        self.schedule_at(now + f64::from(delay.max(0.0)), task);
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Tasks sharing a fire time come out in the order they were queued.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|t| t.fire_at <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Fire time of the earliest pending task.
    pub fn next_fire_time(&self) -> Option<f64> {
        self.pending.iter().map(|t| t.fire_at).min_by(f64::total_cmp)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task. Used when the scene that queued them is torn down.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
