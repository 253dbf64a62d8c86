//! Cancellable delayed tasks keyed by identity.

use std::time::Duration;

/// Pending expirations. Scheduling an existing key restarts its countdown.
#[derive(Debug, Clone)]
pub struct ExpiryScheduler<K> {
    tasks: Vec<(K, Duration)>,
}

impl<K> Default for ExpiryScheduler<K> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<K: PartialEq + Copy> ExpiryScheduler<K> {
    pub fn schedule(&mut self, key: K, after: Duration) {
        self.cancel(key);
        self.tasks.push((key, after));
    }

    /// Returns true if a task was pending for `key`
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(k, _)| *k != key);
        self.tasks.len() != before
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.tasks.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance every countdown and return the keys that ran out, in schedule order
    pub fn tick(&mut self, elapsed: Duration) -> Vec<K> {
        let mut expired = Vec::new();
        self.tasks.retain_mut(|(key, remaining)| {
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                expired.push(*key);
                false
            } else {
                true
            }
        });
        expired
    }
}
