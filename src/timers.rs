//! Keyed one-shot timers on a logical millisecond clock.
//!
//! Nothing here sleeps or registers browser callbacks: the owner asks for due
//! keys with [`TimerQueue::pop_due`] whenever its clock moves (once per
//! animation frame in the browser). At most one timer is pending per key;
//! scheduling a key again replaces the earlier deadline.

#[derive(Clone, Debug)]
struct Pending<K> {
    key: K,
    deadline_ms: f64,
    seq: u64,
}

#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    pending: Vec<Pending<K>>,
    next_seq: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K: PartialEq + Clone> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` to fire at `deadline_ms`, cancelling any earlier arming of
    /// the same key. Returns true if a pending timer was replaced.
    pub fn schedule(&mut self, key: K, deadline_ms: f64) -> bool {
        let replaced = self.cancel(&key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            key,
            deadline_ms,
            seq,
        });
        replaced
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != *key);
        self.pending.len() != before
    }

    /// Cancels every pending key matching `pred`; returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !pred(&p.key));
        before - self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.iter().any(|p| p.key == *key)
    }

    pub fn deadline(&self, key: &K) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.key == *key)
            .map(|p| p.deadline_ms)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns the earliest timer due at `now_ms` (ties broken by
    /// scheduling order), or `None` if nothing is due.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<K> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline_ms <= now_ms)
            .min_by(|(_, a), (_, b)| {
                a.deadline_ms
                    .total_cmp(&b.deadline_ms)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(idx).key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule("late", 500.0);
        q.schedule("early", 100.0);
        q.schedule("tie", 100.0);
        assert_eq!(q.pop_due(50.0), None);
        assert_eq!(q.pop_due(1000.0), Some("early"));
        assert_eq!(q.pop_due(1000.0), Some("tie"));
        assert_eq!(q.pop_due(1000.0), Some("late"));
        assert!(q.is_empty());
    }

    #[test]
    fn rescheduling_replaces() {
        let mut q = TimerQueue::new();
        assert!(!q.schedule(1u8, 100.0));
        assert!(q.schedule(1u8, 300.0));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(200.0), None);
        assert_eq!(q.deadline(&1), Some(300.0));
        assert_eq!(q.pop_due(300.0), Some(1));
    }

    #[test]
    fn cancel_and_cancel_where() {
        let mut q = TimerQueue::new();
        q.schedule(1u32, 10.0);
        q.schedule(2u32, 10.0);
        q.schedule(3u32, 10.0);
        assert!(q.cancel(&2));
        assert!(!q.cancel(&2));
        assert_eq!(q.cancel_where(|k| *k > 2), 1);
        assert!(q.is_pending(&1));
        q.clear();
        assert_eq!(q.pop_due(f64::MAX), None);
    }
}
