use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Number of rate samples kept for the chart.
pub const HISTORY_CAPACITY: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub timestamp: DateTime<Local>,
    pub rate: f64,
}

impl RateSample {
    pub fn new(timestamp: DateTime<Local>, rate: f64) -> Self {
        Self { timestamp, rate }
    }

    /// Time-of-day label used on the chart's x axis
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

impl From<(DateTime<Local>, f64)> for RateSample {
    fn from(v: (DateTime<Local>, f64)) -> Self {
        RateSample::new(v.0, v.1)
    }
}

/// Bounded FIFO of rate samples in arrival order.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<RateSample>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, sample: RateSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateSample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&RateSample> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&RateSample> {
        self.samples.back()
    }

    /// `(index, rate)` pairs for a line chart; labels come from the samples.
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.rate))
            .collect()
    }
}
