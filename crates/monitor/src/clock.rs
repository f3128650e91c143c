use async_trait::async_trait;
use std::time::Duration;

/// Source of cooperative delays.
///
/// The monitor never sleeps directly; routing every wait through this
/// trait lets tests fast-forward the loop deterministically.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspends the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
