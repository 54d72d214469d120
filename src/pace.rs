//! Injectable wait strategy.
//!
//! Fixed-duration waits are load-bearing in this pipeline (detector pages
//! expose no completion signal), but tests must not spend wall-clock time on
//! them. Everything that sleeps does so through a [`Pacer`], so tests swap in
//! [`NoPacer`] and run the identical control flow at full speed.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Production pacer: a real `tokio::time::sleep`.
pub struct SleepPacer;

#[async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Zero-duration pacer for tests.
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn pause(&self, _duration: Duration) {}
}
