//! Single-threaded delayed task queue.
//!
//! Each view keeps its own queue; the host drains it with
//! [`TaskQueue::take_due`]. Tasks are revocable one by one or all at once.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct TaskQueue<T> {
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, due: Instant, task: T) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push(Scheduled { id, due, task });
        id
    }

    /// Drop a pending task. Returns false if it already ran or was revoked.
    pub fn revoke(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn revoke_all(&mut self) {
        self.pending.clear();
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Remove and return every task due at `now`, earliest first. Tasks
    /// with the same deadline come out in scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<(TaskId, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| (s.due, s.id));
        due.into_iter().map(|s| (s.id, s.task)).collect()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn due_tasks_come_out_in_order() {
        let mut queue = TaskQueue::new();
        let t0 = Instant::now();
        queue.schedule(t0 + Duration::from_millis(200), "late");
        queue.schedule(t0, "first");
        queue.schedule(t0, "second");
        let due: Vec<_> = queue.take_due(t0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec!["first", "second"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn revoke_single_task() {
        let mut queue = TaskQueue::new();
        let t0 = Instant::now();
        let a = queue.schedule(t0, 1);
        let b = queue.schedule(t0, 2);
        assert!(queue.revoke(a));
        assert!(!queue.revoke(a));
        assert!(queue.contains(b));
        let due: Vec<_> = queue.take_due(t0).into_iter().map(|(_, t)| t).collect();
        assert_eq!(due, vec![2]);
    }

    #[test]
    fn revoke_all_empties_queue() {
        let mut queue = TaskQueue::new();
        let t0 = Instant::now();
        queue.schedule(t0, ());
        queue.schedule(t0 + Duration::from_secs(1), ());
        queue.revoke_all();
        assert!(queue.is_empty());
        assert!(queue.take_due(t0 + Duration::from_secs(5)).is_empty());
    }
}
