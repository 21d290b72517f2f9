use std::time::Duration;

/// Keys per second over active typing time: every key ever counted divided by
/// every second ever spent inside a typing session. `None` while no active
/// time has accrued.
pub fn keys_per_second(total: u64, active: Duration) -> Option<f64> {
    let secs = active.as_secs_f64();
    if secs > 0.0 {
        Some(total as f64 / secs)
    } else {
        None
    }
}

/// Holds the most recently displayed rate. A keypress that yields no rate
/// leaves the previous figure on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateEstimator {
    current: f64,
}

impl RateEstimator {
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn update(&mut self, total: u64, active: Duration) -> Option<f64> {
        let rate = keys_per_second(total, active)?;
        self.current = rate;
        Some(rate)
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_has_no_rate() {
        assert_eq!(keys_per_second(10, Duration::ZERO), None);
    }

    #[test]
    fn two_keys_in_fifty_ms() {
        let rate = keys_per_second(2, Duration::from_millis(50)).unwrap();
        assert!((rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn update_keeps_previous_on_none() {
        let mut est = RateEstimator::default();
        assert_eq!(est.update(1, Duration::ZERO), None);
        assert_eq!(est.current(), 0.0);

        est.update(4, Duration::from_secs(2));
        assert_eq!(est.current(), 2.0);

        assert_eq!(est.update(5, Duration::ZERO), None);
        assert_eq!(est.current(), 2.0);

        est.reset();
        assert_eq!(est.current(), 0.0);
    }
}
