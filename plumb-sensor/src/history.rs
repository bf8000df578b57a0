//! Bounded reading history.

use plumb_core::CoherenceReading;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of readings. The oldest reading is evicted once the
/// capacity is exceeded; reads return newest first and never mutate.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    readings: VecDeque<CoherenceReading>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, reading: CoherenceReading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// The `count` most recent readings, newest first; all of them when
    /// `count` is `None`. Counts beyond the current size are clamped.
    pub fn retrieve(&self, count: Option<usize>) -> Vec<CoherenceReading> {
        let take = count.unwrap_or(self.readings.len());
        self.readings.iter().rev().take(take).cloned().collect()
    }

    pub fn latest(&self) -> Option<&CoherenceReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// TESTS
// =============================================================================
