//! Post-reading notification.

use async_trait::async_trait;
use plumb_core::{CoherenceReading, PlumbResult};
use std::fmt;

/// Receives every completed reading after it has been recorded in history.
/// An error fails the measurement but does not remove the reading.
#[async_trait]
pub trait ReadingNotifier: Send + Sync {
    async fn notify(&self, reading: &CoherenceReading) -> PlumbResult<()>;
}

/// Notifier backed by a synchronous closure.
pub struct FnNotifier<F> {
    callback: F,
}

impl<F> FnNotifier<F>
where
    F: Fn(&CoherenceReading) -> PlumbResult<()> + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F> ReadingNotifier for FnNotifier<F>
where
    F: Fn(&CoherenceReading) -> PlumbResult<()> + Send + Sync,
{
    async fn notify(&self, reading: &CoherenceReading) -> PlumbResult<()> {
        (self.callback)(reading)
    }
}

impl<F> fmt::Debug for FnNotifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnNotifier").finish_non_exhaustive()
    }
}
