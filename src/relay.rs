//! Lossy single-slot relay between pipeline workers.
//!
//! A [`Slot`] holds at most one pending value. Publishing always
//! succeeds immediately, overwriting anything unconsumed; consuming
//! blocks until a value is present and removes it. Consumers never see
//! a value older than the most recent publish, but may skip values that
//! were overwritten before they got there - freshness over completeness,
//! because steering must react to the newest frame rather than queue
//! stale ones.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// One-capacity mailbox shared between exactly one producer and one
/// consumer side (either may be cloned behind an `Arc`).
pub struct Slot<T> {
    value: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Store a value, replacing any unconsumed one, and wake the
    /// consumer. Never blocks.
    pub fn publish(&self, value: T) {
        let mut slot = self.lock();
        *slot = Some(value);
        self.ready.notify_one();
    }

    /// Take the pending value, blocking until one is published.
    pub fn consume(&self) -> T {
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            slot = match self.ready.wait(slot) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Take the pending value, giving up after `timeout`.
    ///
    /// Workers use this instead of [`consume`](Self::consume) so they
    /// can re-check their stop flag between waits.
    pub fn consume_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.take() {
                return Some(value);
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (guard, _) = match self.ready.wait_timeout(slot, remaining) {
                Ok(result) => result,
                Err(poisoned) => poisoned.into_inner(),
            };
            slot = guard;
        }
    }

    /// Take the pending value if one is present, without waiting.
    pub fn try_consume(&self) -> Option<T> {
        self.lock().take()
    }

    // A poisoned mutex only means a peer thread panicked mid-publish;
    // the Option inside is still coherent, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        match self.value.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_publish_overwrites_unconsumed() {
        let slot = Slot::new();
        slot.publish(1);
        slot.publish(2);
        slot.publish(3);
        // Only the freshest value survives
        assert_eq!(slot.consume(), 3);
        assert_eq!(slot.try_consume(), None);
    }

    #[test]
    fn test_no_drop_when_consumer_keeps_pace() {
        let slot = Slot::new();
        slot.publish("v1");
        assert_eq!(slot.consume(), "v1");
        slot.publish("v2");
        assert_eq!(slot.consume(), "v2");
    }

    #[test]
    fn test_try_consume_empty() {
        let slot: Slot<u32> = Slot::new();
        assert_eq!(slot.try_consume(), None);
    }

    #[test]
    fn test_consume_timeout_elapses() {
        let slot: Slot<u32> = Slot::new();
        let start = Instant::now();
        assert_eq!(slot.consume_timeout(Duration::from_millis(20)), None);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_blocking_consume_wakes_on_publish() {
        let slot = Arc::new(Slot::new());
        let consumer_slot = Arc::clone(&slot);
        let consumer = thread::spawn(move || consumer_slot.consume());
        // Give the consumer time to block first
        thread::sleep(Duration::from_millis(20));
        slot.publish(99);
        assert_eq!(consumer.join().expect("consumer thread"), 99);
    }

    #[test]
    fn test_consume_timeout_returns_published_value() {
        let slot = Arc::new(Slot::new());
        let publisher_slot = Arc::clone(&slot);
        let publisher = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            publisher_slot.publish(7);
        });
        assert_eq!(slot.consume_timeout(Duration::from_secs(2)), Some(7));
        publisher.join().expect("publisher thread");
    }
}
