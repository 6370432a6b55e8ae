//! Settling timer for rapidly-changing query input
//!
//! A [`Debouncer`] watches a value that changes on every keystroke and
//! promotes it to the settled value only once it has been stable for the
//! full delay. Superseded values are never observable: each `reset`
//! replaces the pending value wholesale and restarts the wait.

use tokio::time::{sleep_until, Duration, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Debounces a value with an explicit `reset` / `settled` contract,
/// independent of any UI binding. Dropping the debouncer drops any
/// pending value with it.
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Record a new input value and restart the full wait. Resetting back
    /// to the already-settled value cancels the pending wait instead.
    pub fn reset(&mut self, value: T) {
        if value == self.settled {
            self.pending = None;
            return;
        }
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Promote the pending value if its deadline has passed. Returns the
    /// newly settled value, or None when nothing settled on this call.
    pub fn poll(&mut self) -> Option<&T> {
        let due = self
            .pending
            .as_ref()
            .map_or(false, |p| Instant::now() >= p.deadline);
        if !due {
            return None;
        }
        if let Some(pending) = self.pending.take() {
            self.settled = pending.value;
        }
        Some(&self.settled)
    }

    /// Most recently settled value
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// Whether an input value is still waiting out its delay
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait until the pending value (if any) settles, then return the
    /// settled value. Cancellation-safe: the pending value stays queued
    /// if the future is dropped mid-wait.
    pub async fn until_settled(&mut self) -> &T {
        while let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) {
            sleep_until(deadline).await;
            self.poll();
        }
        &self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_only_final_value_settles() {
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        // Typing "lon" one keystroke at a time, faster than the delay
        for keystroke in ["l", "lo", "lon"] {
            debouncer.reset(keystroke.to_string());
            advance(Duration::from_millis(100)).await;
            assert!(debouncer.poll().is_none());
        }

        advance(DELAY).await;
        assert_eq!(debouncer.poll(), Some(&"lon".to_string()));
        assert_eq!(debouncer.settled(), "lon");
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_reset_restarts_the_wait() {
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        debouncer.reset("par".to_string());
        advance(Duration::from_millis(499)).await;
        assert!(debouncer.poll().is_none());

        // One more keystroke just before the deadline restarts the clock
        debouncer.reset("pari".to_string());
        advance(Duration::from_millis(499)).await;
        assert!(debouncer.poll().is_none());

        advance(Duration::from_millis(1)).await;
        assert_eq!(debouncer.poll(), Some(&"pari".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_to_settled_cancels_pending() {
        let mut debouncer = Debouncer::new("lon".to_string(), DELAY);

        debouncer.reset("lond".to_string());
        assert!(debouncer.is_pending());

        debouncer.reset("lon".to_string());
        assert!(!debouncer.is_pending());

        advance(DELAY).await;
        assert!(debouncer.poll().is_none());
        assert_eq!(debouncer.settled(), "lon");
    }

    #[tokio::test(start_paused = true)]
    async fn test_until_settled_waits_out_the_delay() {
        let mut debouncer = Debouncer::new(String::new(), DELAY);
        debouncer.reset("tokyo".to_string());

        let settled = debouncer.until_settled().await;
        assert_eq!(settled, "tokyo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_until_settled_with_nothing_pending() {
        let mut debouncer = Debouncer::new("osaka".to_string(), DELAY);
        assert_eq!(debouncer.until_settled().await, "osaka");
    }
}
