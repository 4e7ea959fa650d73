//! One-shot deferred actions keyed by fire time.

/// Slack applied when comparing fire times against the clock so that
/// accumulated frame deltas (0.1 + 0.1 + ...) do not push an action one
/// frame late.
pub const FIRE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Entry<A> {
    fire_at: f64,
    id: TaskId,
    action: A,
}

/// Pending `(fire_at, action)` pairs polled every tick. Entries fire in
/// fire-time order, ties in scheduling order.
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: f64, action: A) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        // Keep sorted; insertion after equal fire times preserves scheduling order.
        let idx = self.entries.partition_point(|e| e.fire_at <= fire_at);
        self.entries.insert(
            idx,
            Entry {
                fire_at,
                id,
                action,
            },
        );
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> Option<A> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx).action)
    }

    /// Remove and return every action due at `now`.
    pub fn take_due(&mut self, now: f64) -> Vec<A> {
        let due = self
            .entries
            .partition_point(|e| e.fire_at <= now + FIRE_EPSILON);
        self.entries.drain(..due).map(|e| e.action).collect()
    }

    pub fn next_fire_at(&self) -> Option<f64> {
        self.entries.first().map(|e| e.fire_at)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &A)> {
        self.entries.iter().map(|e| (e.fire_at, &e.action))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
