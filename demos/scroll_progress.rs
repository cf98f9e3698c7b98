//! Scroll progress example using a throttled scroll handler.
//!
//! Replays a burst of scroll events arriving every 4ms. The throttled
//! handler recomputes the progress bar at most once per 16ms frame, and
//! the remaining events are dropped.
//!
//! Run with `RUST_LOG=call_pacer=debug` to see dropped events.

use call_pacer::{scroll_progress, throttle};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SCROLL_HEIGHT: f64 = 4_000.0;
const VIEWPORT_HEIGHT: f64 = 800.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    println!("=== Throttled Scroll Progress Example ===\n");
    println!(
        "Document: {}px tall, viewport {}px, limit 16ms\n",
        SCROLL_HEIGHT, VIEWPORT_HEIGHT
    );

    let update_bar = throttle(
        |scroll_top: f64| {
            let progress = scroll_progress(scroll_top, SCROLL_HEIGHT, VIEWPORT_HEIGHT);
            let filled = (progress / 5.0).round() as usize;
            println!(
                "  top={:>6.1}px [{:<20}] {:>5.1}%",
                scroll_top,
                "#".repeat(filled),
                progress
            );
            progress
        },
        16,
    )?;

    // 80 events, 40px each, 4ms apart
    let mut last_drawn = 0.0;
    for step in 0..=80 {
        let scroll_top = f64::from(step) * 40.0;
        if let Some(progress) = update_bar.call((scroll_top,)) {
            last_drawn = progress;
        }
        std::thread::sleep(Duration::from_millis(4));
    }

    let snapshot = update_bar.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Scroll events: {}, redraws: {}, dropped: {} ({:.0}%)",
        snapshot.calls,
        snapshot.executions,
        snapshot.calls_dropped,
        snapshot.suppression_rate() * 100.0
    );
    println!("Last drawn progress: {:.1}%", last_drawn);
    println!("Notice: the final event may be dropped; throttling has no trailing call.");

    Ok(())
}
