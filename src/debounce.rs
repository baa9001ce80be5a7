//! Debouncing for rapid-fire events (scroll, resize).
//!
//! The debouncer never runs anything itself. Each method returns the
//! arguments the debounced action should run with, and the event loop runs
//! the action. That keeps the action on the loop's thread, so it never runs
//! concurrently with itself and can borrow application state mutably.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut scroll = Debouncer::new(Duration::from_millis(100), false);
//!
//! // On every scroll event:
//! if let Some(offset) = scroll.call(offset, Instant::now()) {
//!     app.on_scroll_settled(offset);
//! }
//!
//! // When the loop's timer for `scroll.deadline()` expires:
//! if let Some(offset) = scroll.poll(Instant::now()) {
//!     app.on_scroll_settled(offset);
//! }
//! ```

#![allow(dead_code)]

use std::time::{Duration, Instant};

/// Default quiet period between the last event of a burst and the action.
pub const DEFAULT_QUIET_MS: u64 = 100;

/// Coalesces a burst of calls into a single action invocation.
///
/// In trailing mode the action runs once, `quiet` after the last call of a
/// burst, with that call's arguments. In leading mode the first call of an
/// idle period runs the action immediately and the rest of the burst is
/// suppressed.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    /// Quiet period that ends a burst
    quiet: Duration,
    /// Fire on the first call of a burst instead of after it
    leading: bool,
    /// When the loop should call `poll`; `None` when no burst is in progress
    timer: Option<Instant>,
    /// Time of the most recent call
    last_call: Option<Instant>,
    /// Arguments of the most recent call not yet handed out
    args: Option<A>,
}

impl<A> Debouncer<A> {
    pub fn new(quiet: Duration, leading: bool) -> Self {
        Self {
            quiet,
            leading,
            timer: None,
            last_call: None,
            args: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    pub fn is_leading(&self) -> bool {
        self.leading
    }

    /// Record a call. Returns `Some(args)` when the action must run right now
    /// (first call of a burst in leading mode).
    pub fn call(&mut self, args: A, now: Instant) -> Option<A> {
        self.args = Some(args);
        self.last_call = Some(now);

        let call_now = self.leading && self.timer.is_none();
        if self.timer.is_none() {
            self.timer = Some(now + self.quiet);
        }

        if call_now { self.args.take() } else { None }
    }

    /// Timer callback. Re-arms the timer while calls keep arriving and
    /// returns the coalesced arguments once the burst has gone quiet.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let deadline = self.timer?;
        if now < deadline {
            return None;
        }

        let last = self.last_call.unwrap_or(deadline);
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.quiet {
            self.timer = Some(last + self.quiet);
            return None;
        }

        self.timer = None;
        if self.leading {
            // Calls suppressed during a leading-edge burst are dropped
            self.args = None;
            None
        } else {
            self.args.take()
        }
    }

    /// When the event loop should next call `poll`.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer
    }

    /// Whether a burst is in progress.
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Discard any pending execution without running it.
    pub fn cancel(&mut self) {
        self.timer = None;
        self.args = None;
    }

    /// Run the pending execution now: returns the last recorded arguments, if
    /// any, and disarms the timer.
    pub fn flush(&mut self) -> Option<A> {
        self.timer.take()?;
        self.args.take()
    }
}

impl<A> Default for Debouncer<A> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_QUIET_MS), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_trailing_fires_once_with_last_args() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), false);

        assert_eq!(debouncer.call(1, start), None);
        assert_eq!(debouncer.call(2, start + ms(30)), None);
        assert_eq!(debouncer.call(3, start + ms(60)), None);

        // First deadline hits while the burst is still active: re-armed
        assert_eq!(debouncer.poll(start + ms(100)), None);
        assert_eq!(debouncer.deadline(), Some(start + ms(160)));

        assert_eq!(debouncer.poll(start + ms(160)), Some(3));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(500)), None);
    }

    #[test]
    fn test_poll_before_deadline_is_noop() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), false);

        debouncer.call("a", start);
        assert_eq!(debouncer.poll(start + ms(50)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_leading_fires_immediately_then_suppresses() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), true);

        assert_eq!(debouncer.call(1, start), Some(1));
        assert_eq!(debouncer.call(2, start + ms(20)), None);
        assert_eq!(debouncer.call(3, start + ms(40)), None);

        // Burst ends quietly, nothing fires on the trailing edge
        assert_eq!(debouncer.poll(start + ms(140)), None);
        assert!(!debouncer.is_pending());

        // Next idle period fires immediately again
        assert_eq!(debouncer.call(4, start + ms(300)), Some(4));
    }

    #[test]
    fn test_leading_stays_suppressed_until_quiet_gap() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), true);

        assert_eq!(debouncer.call(1, start), Some(1));
        assert_eq!(debouncer.call(2, start + ms(90)), None);
        assert_eq!(debouncer.poll(start + ms(100)), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.call(3, start + ms(150)), None);
    }

    #[test]
    fn test_flush_runs_pending_and_disarms() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), false);

        debouncer.call(7, start);
        debouncer.call(8, start + ms(10));
        assert_eq!(debouncer.flush(), Some(8));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(500)), None);

        // Idempotent
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_cancel_discards_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100), false);

        debouncer.call(1, start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + ms(200)), None);
        assert_eq!(debouncer.flush(), None);

        debouncer.cancel();
        assert!(!debouncer.is_pending());
    }
}
