//! Form validation example using a debounced input handler.
//!
//! Simulates a user typing into the email and phone fields of a contact
//! form. Each keystroke calls the debounced validator; validation only runs
//! once typing pauses for the configured delay, with the final value.
//!
//! Run with `RUST_LOG=call_pacer=debug` to see superseded keystrokes.

use call_pacer::{validate_field, FieldKind, FieldValidity, RateLimiter};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn report(kind: FieldKind, value: String) {
    let verdict = match validate_field(kind, &value, true) {
        FieldValidity::Valid => "valid",
        FieldValidity::Missing => "missing (field is required)",
        FieldValidity::Malformed => "malformed",
    };
    println!("  validated {:?} field {:?}: {}", kind, value, verdict);
}

async fn type_into<F>(label: &str, text: &str, keystroke_gap: Duration, on_input: F)
where
    F: Fn((String,)),
{
    println!("Typing {:?} into the {} field:", text, label);
    let mut typed = String::new();
    for ch in text.chars() {
        typed.push(ch);
        on_input((typed.clone(),));
        tokio::time::sleep(keystroke_gap).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    println!("=== Debounced Form Validation Example ===\n");

    let limiter = RateLimiter::builder().with_debounce_delay_ms(250).build()?;

    for kind in [FieldKind::Email, FieldKind::Tel] {
        println!(
            "{:?} field hints: autocomplete={:?} inputmode={:?}",
            kind,
            kind.autocomplete(),
            kind.input_mode()
        );
    }
    println!();

    let validate_email = limiter.debounce_default(|value: String| report(FieldKind::Email, value))?;
    let validate_phone = limiter.debounce_default(|value: String| report(FieldKind::Tel, value))?;

    // Fast typing: one validation per word
    type_into(
        "email",
        "ada@example",
        Duration::from_millis(40),
        validate_email.handler(),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    type_into(
        "email",
        "ada@example.com",
        Duration::from_millis(40),
        validate_email.handler(),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    type_into(
        "phone",
        "+4915112345678",
        Duration::from_millis(60),
        validate_phone.handler(),
    )
    .await;

    // Submitting the form cancels the pending validation
    if validate_phone.cancel() {
        println!("  form submitted, pending phone validation cancelled");
    }
    report(FieldKind::Tel, "+4915112345678".to_string());

    let snapshot = limiter.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Keystrokes: {}, validations run: {}, superseded: {}, cancelled: {}",
        snapshot.calls, snapshot.executions, snapshot.calls_superseded, snapshot.calls_cancelled
    );

    Ok(())
}
