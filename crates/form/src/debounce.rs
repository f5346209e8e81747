//! Keyed debouncing
//!
//! A [`Debouncer`] is a small timer map: each key holds at most one pending
//! deadline plus the arguments of the most recent call. Re-scheduling a key
//! replaces its entry, so a burst of calls fires once with the last
//! arguments. The owner decides how to wait: `next_due().await` inside an
//! event loop, or `take_due(now)` when the host drives time itself.
//!
//! ```rust
//! use std::time::Duration;
//! use diary_form::debounce::Debouncer;
//! use tokio::time::Instant;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//! debouncer.schedule("journal", "h");
//! debouncer.schedule("journal", "hello");
//! assert_eq!(debouncer.len(), 1);
//!
//! let due = debouncer.take_due(Instant::now() + Duration::from_millis(300));
//! assert_eq!(due, vec![("journal", "hello")]);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

/// Default quiet interval.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Pending<A> {
    deadline: Instant,
    seq: u64,
    args: A,
}

/// Key-scoped debounce timers.
#[derive(Debug)]
pub struct Debouncer<K, A> {
    delay: Duration,
    seq: u64,
    pending: HashMap<K, Pending<A>>,
}

impl<K, A> Default for Debouncer<K, A> {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            seq: 0,
            pending: HashMap::new(),
        }
    }
}

impl<K, A> Debouncer<K, A>
where
    K: Eq + Hash + Clone,
{
    /// Creates a debouncer with the given quiet interval.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// The quiet interval used by [`schedule`](Self::schedule).
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms `key` with the default delay, replacing any pending entry.
    pub fn schedule(&mut self, key: K, args: A) {
        self.schedule_in(key, args, self.delay);
    }

    /// Arms `key` to fire after `delay`, replacing any pending entry.
    pub fn schedule_in(&mut self, key: K, args: A, delay: Duration) {
        self.seq += 1;
        self.pending.insert(
            key,
            Pending {
                deadline: Instant::now() + delay,
                seq: self.seq,
                args,
            },
        );
    }

    /// Drops the pending entry for `key`, returning its arguments.
    pub fn cancel(&mut self, key: &K) -> Option<A> {
        self.pending.remove(key).map(|p| p.args)
    }

    /// Drops every pending entry.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Whether `key` has a pending entry.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Removes and returns every entry due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, A)> {
        let mut due: Vec<(Instant, u64, K)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(k, p)| (p.deadline, p.seq, k.clone()))
            .collect();
        due.sort_by_key(|(deadline, seq, _)| (*deadline, *seq));

        due.into_iter()
            .filter_map(|(_, _, key)| self.pending.remove(&key).map(|p| (key, p.args)))
            .collect()
    }

    /// Removes and returns every entry regardless of deadline, earliest first.
    pub fn drain(&mut self) -> Vec<(K, A)> {
        let mut all: Vec<(K, Pending<A>)> = self.pending.drain().collect();
        all.sort_by_key(|(_, p)| (p.deadline, p.seq));
        all.into_iter().map(|(k, p)| (k, p.args)).collect()
    }

    /// Waits for the earliest deadline and yields its entry.
    ///
    /// Returns `None` immediately when nothing is pending. Cancel-safe:
    /// dropping the future before the deadline leaves the entry in place.
    pub async fn next_due(&mut self) -> Option<(K, A)> {
        let deadline = self.next_deadline()?;
        tokio::time::sleep_until(deadline).await;

        let key = self
            .pending
            .iter()
            .min_by_key(|(_, p)| (p.deadline, p.seq))
            .map(|(k, _)| k.clone())?;
        self.pending.remove(&key).map(|p| (key, p.args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_args() {
        let mut debouncer = Debouncer::new(WINDOW);
        for i in 1..=5 {
            debouncer.schedule("k", i);
            tokio::time::advance(Duration::from_millis(50)).await;
        }
        assert_eq!(debouncer.len(), 1);

        let fired = debouncer.next_due().await;
        assert_eq!(fired, Some(("k", 5)));
        assert!(debouncer.next_due().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_full_window_from_last_call() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("k", ());
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.schedule("k", ());

        debouncer.next_due().await;
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_millis(500), "fired early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(510), "fired late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1);
        tokio::time::advance(Duration::from_millis(100)).await;
        debouncer.schedule("b", 2);

        assert_eq!(debouncer.next_due().await, Some(("a", 1)));
        assert_eq!(debouncer.next_due().await, Some(("b", 2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_next_due_keeps_entry() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("k", 1);

        let early = tokio::time::timeout(Duration::from_millis(100), debouncer.next_due()).await;
        assert!(early.is_err());
        assert!(debouncer.is_pending(&"k"));
    }

    #[test]
    fn test_take_due_orders_by_deadline() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule_in("late", 2, Duration::from_millis(200));
        debouncer.schedule_in("early", 1, Duration::from_millis(100));
        debouncer.schedule_in("never", 3, Duration::from_secs(60));

        let due = debouncer.take_due(Instant::now() + Duration::from_millis(250));
        assert_eq!(due, vec![("early", 1), ("late", 2)]);
        assert_eq!(debouncer.len(), 1);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1);
        debouncer.schedule("b", 2);
        assert_eq!(debouncer.cancel(&"a"), Some(1));
        assert!(!debouncer.is_pending(&"a"));
        debouncer.clear();
        assert!(debouncer.is_empty());
        assert!(debouncer.next_deadline().is_none());
    }

    #[test]
    fn test_drain_ignores_deadlines() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule("a", 1);
        debouncer.schedule("b", 2);
        assert_eq!(debouncer.drain(), vec![("a", 1), ("b", 2)]);
        assert!(debouncer.is_empty());
    }
}
