use std::time::Instant;

use chrono::{DateTime, Local};

use crate::classify::{Category, KeyStroke};
use crate::counters::CounterState;
use crate::history::{HistoryBuffer, RateSample};
use crate::rate::RateEstimator;
use crate::session::SessionTracker;
use crate::store::CounterStore;

/// What a single keypress did to the tally
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypress {
    pub category: Category,
    pub new_session: bool,
    pub sample: Option<RateSample>,
}

/// The counting state machine: classification, tallies, session tracking,
/// rate estimation and rate history, with write-through persistence.
///
/// All mutation goes through `record`, `on_tick` and `reset`; the renderer
/// only reads.
pub struct KeyTally {
    counters: CounterState,
    sessions: SessionTracker,
    rate: RateEstimator,
    history: HistoryBuffer,
    store: Box<dyn CounterStore>,
}

impl std::fmt::Debug for KeyTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTally")
            .field("counters", &self.counters)
            .field("sessions", &self.sessions)
            .field("rate", &self.rate)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl KeyTally {
    /// Start from whatever counts the store already holds.
    pub fn new(store: Box<dyn CounterStore>) -> Self {
        let counters = store.load_counters();
        log::info!("loaded {} keypresses from store", counters.total());
        Self {
            counters,
            sessions: SessionTracker::new(),
            rate: RateEstimator::default(),
            history: HistoryBuffer::default(),
            store,
        }
    }

    /// Count one keypress arriving at `now` (`wall` is the same instant on the
    /// wall clock, used to label the rate sample).
    pub fn record(&mut self, stroke: &KeyStroke, now: Instant, wall: DateTime<Local>) -> Keypress {
        let category = stroke.category();
        self.counters.record(category);

        let new_session = self.sessions.on_keypress(now);

        let active = self.sessions.live_active(now);
        let sample = self
            .rate
            .update(self.counters.total(), active)
            .map(|rate| RateSample::new(wall, rate));
        if let Some(sample) = sample {
            self.history.push(sample);
        }

        if let Err(e) = self.store.save_counters(category, &self.counters) {
            log::warn!("failed to persist {category} count: {e}");
        }

        log::trace!(
            "key {:?}/{:?} -> {category}, total {}, active {:?}",
            stroke.key,
            stroke.code,
            self.counters.total(),
            active
        );

        Keypress {
            category,
            new_session,
            sample,
        }
    }

    /// Advance timers. Returns true when the idle watchdog closed a session.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let closed = self.sessions.on_tick(now);
        if closed {
            log::debug!(
                "typing session closed, active time now {:?}",
                self.sessions.accumulated()
            );
        }
        closed
    }

    /// Zero every tally, forget session history and delete the stored counts.
    pub fn reset(&mut self) {
        self.counters.reset();
        self.sessions.reset();
        self.rate.reset();
        self.history.clear();
        if let Err(e) = self.store.clear_counters() {
            log::warn!("failed to clear stored counts: {e}");
        }
        log::info!("counters reset");
    }

    pub fn counters(&self) -> &CounterState {
        &self.counters
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    /// Last computed keys-per-second figure
    pub fn rate(&self) -> f64 {
        self.rate.current()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn store(&self) -> &dyn CounterStore {
        self.store.as_ref()
    }
}
