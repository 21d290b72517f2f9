use std::time::{Duration, Instant};

/// One-shot deadline polled from the event loop.
///
/// `arm` replaces any pending deadline, so at most one is ever outstanding.
/// `cancel` on an idle timer is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    delay: Duration,
    due: Option<Instant>,
}

impl Deadline {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
