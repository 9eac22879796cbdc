//! Injectable pacing for the local simulator.
//!
//! The simulator pauses briefly before answering so the shell's loading
//! state is visible — UX pacing, not real work. The pause sits behind a
//! trait so tests run with a no-op implementation and stay deterministic.

use std::time::Duration;

use async_trait::async_trait;

/// Fixed pause the simulator applies to each dispatch.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(800);

#[async_trait]
pub trait Pacing: Send + Sync {
    async fn pause(&self);
}

/// Real pacing on the tokio timer.
pub struct FixedPacing {
    delay: Duration,
}

impl FixedPacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedPacing {
    fn default() -> Self {
        Self::new(SIMULATED_LATENCY)
    }
}

#[async_trait]
impl Pacing for FixedPacing {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No pause at all. Used by tests and the one-shot CLI.
pub struct NoPacing;

#[async_trait]
impl Pacing for NoPacing {
    async fn pause(&self) {}
}
