use chrono::{DateTime, Duration, Utc};

/// Delay before transient incorrect feedback reverts, in milliseconds.
pub(crate) const REVERT_DELAY_MS: i64 = 1_000;

pub(crate) fn revert_delay() -> Duration {
    Duration::milliseconds(REVERT_DELAY_MS)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RevertEntry<K> {
    pub key: K,
    pub generation: u64,
    pub due_at: DateTime<Utc>,
}

/// Pending timed reverts for transient incorrect feedback.
///
/// Entries carry the item's flash generation at scheduling time. Re-flashing
/// an item bumps its generation, so an older entry that fires later no
/// longer matches and must be ignored by the caller: last write wins, stale
/// reverts are no-ops. Dropping the queue discards all pending reverts.
#[derive(Debug)]
pub(crate) struct RevertQueue<K> {
    entries: Vec<RevertEntry<K>>,
}

impl<K: Copy> RevertQueue<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, key: K, generation: u64, due_at: DateTime<Utc>) {
        self.entries.push(RevertEntry {
            key,
            generation,
            due_at,
        });
    }

    /// Removes and returns every entry due at or before `now`.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<RevertEntry<K>> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due_at <= now);
        self.entries = pending;
        due
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::time::fixed_now;

    #[test]
    fn drains_only_due_entries() {
        let now = fixed_now();
        let mut queue = RevertQueue::new();
        queue.schedule(1_usize, 1, now + Duration::milliseconds(500));
        queue.schedule(2_usize, 1, now + Duration::milliseconds(1500));

        let due = queue.drain_due(now + Duration::milliseconds(1000));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].key, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn overlapping_entries_for_one_key_both_fire() {
        let now = fixed_now();
        let mut queue = RevertQueue::new();
        queue.schedule(1_usize, 1, now + revert_delay());
        queue.schedule(1_usize, 2, now + Duration::milliseconds(1500));

        let first = queue.drain_due(now + Duration::milliseconds(1100));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].generation, 1);

        let second = queue.drain_due(now + Duration::milliseconds(2000));
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].generation, 2);
    }
}
