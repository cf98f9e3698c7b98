//! Periodic metrics reporting example.
//!
//! Runs a throttled resize handler and a debounced search handler from one
//! `RateLimiter` while a `MetricsReporter` logs a snapshot every second.

use call_pacer::{log_snapshot, MetricsReporter, RateLimiter, ReporterConfig, SnapshotFormatter};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Metrics Reporter Example ===\n");

    let limiter = RateLimiter::builder()
        .with_throttle_limit_ms(100)
        .with_debounce_delay_ms(200)
        .build()?;

    let config = ReporterConfig::new(Duration::from_secs(1))?.with_emit_final(true);
    let formatter: SnapshotFormatter = Arc::new(log_snapshot);
    let reporter = MetricsReporter::new(limiter.metrics().clone(), config).start(formatter);

    let on_resize = limiter.throttle_default(|width: u32, height: u32| {
        tracing::info!(width, height, "layout recomputed");
    });
    let on_search = limiter.debounce_default(|query: String| {
        tracing::info!(%query, "search issued");
    })?;

    for i in 0..60u32 {
        on_resize.call((1024 + i, 768));
        if i % 3 == 0 {
            on_search.call((format!("query {}", i / 3),));
        }
        // Pause mid-way so one search goes out
        let gap = if i == 30 { 500 } else { 40 };
        tokio::time::sleep(Duration::from_millis(gap)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    reporter.shutdown().await?;
    println!("\n=== Example Complete ===");

    Ok(())
}
