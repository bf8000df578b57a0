//! Scheduling ticks supplied by an external clock.

use crate::Timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Why a tick was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickReason {
    /// Regular interval tick
    Scheduled,
    /// Explicitly requested measurement
    Manual,
    /// First tick after the scheduler started
    Startup,
}

/// A discrete scheduling event. The sensor only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: Timestamp,
    pub sequence: u64,
    pub reason: TickReason,
}

impl Tick {
    pub fn new(timestamp: Timestamp, sequence: u64, reason: TickReason) -> Self {
        Self {
            timestamp,
            sequence,
            reason,
        }
    }

    /// Tick stamped with the current time.
    pub fn now(sequence: u64, reason: TickReason) -> Self {
        Self::new(Utc::now(), sequence, reason)
    }
}
