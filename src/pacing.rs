// ABOUTME: Injectable inter-request pacing used by the sequential supplementary fetch loops
// ABOUTME: Production impl sleeps on the tokio timer; tests swap in a zero-delay impl
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use async_trait::async_trait;
use std::time::Duration;

/// Delay strategy between sequential supplementary requests.
///
/// The fixed pauses in the fetch loops are deliberate client-side rate
/// limiting, not an optimization; adapters take the strategy as a trait so
/// tests can run the same loops with zero delay without changing the
/// ordering.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspend for the given duration.
    async fn pause(&self, duration: Duration);
}

/// Production pacer backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPacer;

#[async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Zero-delay pacer for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self, _duration: Duration) {}
}
