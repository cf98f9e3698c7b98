//! Integration tests wiring the form helpers behind the wrappers, the way
//! input and scroll handlers use them.

#![cfg(feature = "async")]

use call_pacer::{scroll_progress, validate_field, FieldKind, FieldValidity, RateLimiter};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{advance, sleep};

#[tokio::test(start_paused = true)]
async fn test_debounced_validation_sees_final_value() {
    let limiter = RateLimiter::new();
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);

    let on_input = limiter
        .debounce_default(move |kind: FieldKind, value: String| {
            sink.lock().unwrap().push(validate_field(kind, &value, true));
        })
        .unwrap();

    let mut typed = String::new();
    for ch in "ada@example.com".chars() {
        typed.push(ch);
        on_input.call((FieldKind::Email, typed.clone()));
        sleep(Duration::from_millis(30)).await;
    }
    sleep(Duration::from_millis(250)).await;

    assert_eq!(*results.lock().unwrap(), vec![FieldValidity::Valid]);
    assert_eq!(limiter.metrics().executions(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cleared_required_field_reports_missing() {
    let limiter = RateLimiter::builder()
        .with_debounce_delay_ms(100)
        .build()
        .unwrap();
    let results = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&results);

    let input_type = "tel";
    let on_input = limiter
        .debounce_default(move |value: &'static str| {
            let kind = FieldKind::from_input_type(input_type);
            sink.lock().unwrap().push(validate_field(kind, value, true));
        })
        .unwrap();

    on_input.call(("12ab",));
    sleep(Duration::from_millis(150)).await;
    on_input.call(("",));
    sleep(Duration::from_millis(150)).await;

    assert_eq!(
        *results.lock().unwrap(),
        vec![FieldValidity::Malformed, FieldValidity::Missing]
    );
}

#[tokio::test(start_paused = true)]
async fn test_throttled_scroll_progress() {
    let limiter = RateLimiter::new();
    let drawn = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&drawn);

    let on_scroll = limiter.throttle_default(move |top: f64| {
        let progress = scroll_progress(top, 2_000.0, 1_000.0);
        sink.lock().unwrap().push(progress);
        progress
    });

    // Scroll events every 4ms, one frame is 16ms
    for step in 0..=25u32 {
        on_scroll.call((f64::from(step) * 40.0,));
        advance(Duration::from_millis(4)).await;
    }

    let drawn = drawn.lock().unwrap();
    // Steps 0, 4, 8, ... 24 fall on frame boundaries
    assert_eq!(drawn.len(), 7);
    assert_eq!(drawn[0], 0.0);
    assert_eq!(drawn[1], 16.0);
    assert_eq!(*drawn.last().unwrap(), 96.0);
    assert!(drawn.iter().all(|p| (0.0..=100.0).contains(p)));
}
