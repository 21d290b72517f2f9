use std::time::{Duration, Instant};

use crate::timer::Deadline;

/// Gap between keypresses that ends one typing session and starts the next.
pub const IDLE_THRESHOLD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Active,
}

/// Splits the keypress stream into active sessions and keeps the running
/// total of time spent inside them.
///
/// A session is folded into the accumulated total either when the next
/// keypress arrives after an idle gap, or when the idle watchdog fires first.
/// Whichever happens first clears `session_start`, so the fold runs once.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    accumulated: Duration,
    session_start: Option<Instant>,
    last_event: Option<Instant>,
    watchdog: Deadline,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            session_start: None,
            last_event: None,
            watchdog: Deadline::new(IDLE_THRESHOLD),
        }
    }

    /// Register a keypress. Returns true when it opened a new session.
    pub fn on_keypress(&mut self, now: Instant) -> bool {
        let new_session = match self.last_event {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= IDLE_THRESHOLD,
        };

        if new_session {
            self.fold_current();
            self.session_start = Some(now);
        }

        self.last_event = Some(now);
        self.watchdog.arm(now);
        new_session
    }

    /// Drive the idle watchdog. Returns true when it fired and closed the
    /// running session.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.watchdog.poll(now) {
            return false;
        }
        self.fold_current();
        self.session_start = None;
        true
    }

    fn fold_current(&mut self) {
        if let (Some(start), Some(last)) = (self.session_start, self.last_event) {
            self.accumulated += last.saturating_duration_since(start);
        }
    }

    /// Folded total plus the elapsed part of the running session.
    pub fn live_active(&self, now: Instant) -> Duration {
        let running = self
            .session_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.accumulated + running
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn session_start(&self) -> Option<Instant> {
        self.session_start
    }

    pub fn last_event(&self) -> Option<Instant> {
        self.last_event
    }

    pub fn phase(&self) -> SessionPhase {
        if self.session_start.is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::Idle
        }
    }

    pub fn watchdog_pending(&self) -> bool {
        self.watchdog.is_pending()
    }

    pub fn reset(&mut self) {
        self.watchdog.cancel();
        self.accumulated = Duration::ZERO;
        self.session_start = None;
        self.last_event = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_keypress_opens_session() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();
        assert_eq!(tracker.phase(), SessionPhase::Idle);

        assert!(tracker.on_keypress(t0));
        assert_eq!(tracker.phase(), SessionPhase::Active);
        assert_eq!(tracker.session_start(), Some(t0));
        assert_eq!(tracker.live_active(t0), Duration::ZERO);
    }

    #[test]
    fn idle_gap_starts_new_session_and_folds_previous() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();

        tracker.on_keypress(t0);
        assert!(!tracker.on_keypress(t0 + ms(100)));
        assert!(tracker.on_keypress(t0 + ms(700)));

        assert_eq!(tracker.accumulated(), ms(100));
        assert_eq!(tracker.session_start(), Some(t0 + ms(700)));
    }

    #[test]
    fn gap_exactly_at_threshold_splits() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();

        tracker.on_keypress(t0);
        tracker.on_keypress(t0 + ms(200));
        assert!(tracker.on_keypress(t0 + ms(700)));
        assert_eq!(tracker.accumulated(), ms(200));
    }

    #[test]
    fn watchdog_folds_once() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();

        tracker.on_keypress(t0);
        tracker.on_keypress(t0 + ms(300));

        assert!(!tracker.on_tick(t0 + ms(799)));
        assert!(tracker.on_tick(t0 + ms(800)));
        assert_eq!(tracker.phase(), SessionPhase::Idle);
        assert_eq!(tracker.accumulated(), ms(300));
        assert_eq!(tracker.live_active(t0 + ms(5_000)), ms(300));

        // next keypress must not fold the same session again
        assert!(tracker.on_keypress(t0 + ms(2_000)));
        assert_eq!(tracker.accumulated(), ms(300));
        assert!(!tracker.on_tick(t0 + ms(2_100)));
    }

    #[test]
    fn keypress_rearms_watchdog() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();

        tracker.on_keypress(t0);
        tracker.on_keypress(t0 + ms(400));
        assert!(!tracker.on_tick(t0 + ms(600)));
        assert!(tracker.on_tick(t0 + ms(900)));
    }

    #[test]
    fn accumulated_is_monotonic() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();
        let mut prev = Duration::ZERO;
        let mut t = t0;
        for gap in [50u64, 600, 20, 900, 499, 500, 10] {
            t += ms(gap);
            tracker.on_keypress(t);
            tracker.on_tick(t + ms(250));
            assert!(tracker.accumulated() >= prev);
            prev = tracker.accumulated();
        }
    }

    #[test]
    fn steady_typing_accumulates_n_minus_one_intervals() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();
        let n = 50u64;
        for i in 0..n {
            tracker.on_keypress(t0 + ms(i * 100));
        }
        assert_eq!(tracker.live_active(t0 + ms((n - 1) * 100)), ms((n - 1) * 100));
    }

    #[test]
    fn reset_clears_everything() {
        let t0 = Instant::now();
        let mut tracker = SessionTracker::new();
        tracker.on_keypress(t0);
        tracker.on_keypress(t0 + ms(600));

        tracker.reset();
        assert_eq!(tracker.accumulated(), Duration::ZERO);
        assert_eq!(tracker.session_start(), None);
        assert_eq!(tracker.last_event(), None);
        assert!(!tracker.watchdog_pending());
        assert!(!tracker.on_tick(t0 + ms(10_000)));

        tracker.reset();
        assert_eq!(tracker.phase(), SessionPhase::Idle);
    }
}
