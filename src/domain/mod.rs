//! Domain layer - pure logic with no runtime or clock dependency.
//!
//! This layer contains the core concepts and invariants of call shaping:
//! - Validated delays
//! - Throttle and debounce state machines
//! - Form field validation
//! - Scroll progress computation
//!
//! Every function takes the current instant as an argument instead of
//! reading a clock, so all types here are deterministic.

pub mod delay;
pub mod policy;
pub mod progress;
pub mod validation;
