use std::time::Duration;

/// One-shot deadlines on a virtual clock, keyed by `K`.
///
/// The clock is a `Duration` since the app started. Nothing here reads wall
/// time: the owner advances the clock and asks which deadlines came due, so
/// tests can step through transitions without sleeping.
#[derive(Clone, Debug)]
pub struct Timers<K> {
    pending: Vec<(K, Duration)>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `at`, replacing any deadline it already had.
    pub fn schedule(&mut self, key: K, at: Duration) {
        self.cancel(key);
        self.pending.push((key, at));
    }

    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        self.pending.len() != before
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == key)
    }

    pub fn deadline(&self, key: K) -> Option<Duration> {
        self.pending
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, at)| *at)
    }

    /// Remove and return every key due at `now`, earliest deadline first.
    pub fn pop_due(&mut self, now: Duration) -> Vec<K> {
        let mut due: Vec<(K, Duration)> = Vec::new();
        self.pending.retain(|(k, at)| {
            if *at <= now {
                due.push((*k, *at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, at)| *at);
        due.into_iter().map(|(k, _)| k).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
