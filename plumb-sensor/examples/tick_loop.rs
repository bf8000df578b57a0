//! Drive a sensor from a fixed-interval tick source and log each reading.
//!
//! Run with `RUST_LOG=plumb_sensor=debug` to see every pipeline stage.

use plumb_core::AgentState;
use plumb_sensor::{CoherenceSensor, PlumbResult, SensorSettings, Tick, TickReason};
use plumb_test_utils::{fixtures, CountingEmbeddingProvider, StaticStateProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> PlumbResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("plumb_sensor=info,plumb_metrics=warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(StaticStateProvider::new(AgentState {
        goals: fixtures::strings(&["ship the release"]),
        recent_context: fixtures::strings(&["ship the release", "triage the backlog"]),
        all_memories: fixtures::strings(&["release checklist", "ship the release"]),
        goal_memories: fixtures::strings(&["ship the release"]),
    }));

    let sensor = CoherenceSensor::builder(Arc::new(CountingEmbeddingProvider::new(32)), state)
        .settings(SensorSettings::from_env())
        .notify_with(|reading| {
            if reading.band.rank() <= 1 {
                tracing::warn!(band = %reading.band, "Agent is losing coherence");
            }
            Ok(())
        })
        .build()?;

    let mut interval = tokio::time::interval(Duration::from_millis(200));
    for sequence in 0..5u64 {
        interval.tick().await;
        let reason = if sequence == 0 {
            TickReason::Startup
        } else {
            TickReason::Scheduled
        };
        let reading = sensor.measure(&Tick::now(sequence, reason)).await?;
        tracing::info!(
            sequence,
            coherence_index = reading.coherence_index,
            band = %reading.band,
            "Tick measured"
        );
    }

    tracing::info!(readings = sensor.history_len(), "Done");
    Ok(())
}
