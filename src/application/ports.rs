//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, TokioClock,
/// MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// An operation that can be invoked with an argument tuple.
///
/// Implemented for every `Fn` taking up to six arguments, so plain closures
/// can be wrapped directly. The argument list is passed as a tuple: `()` for
/// no arguments, `(a,)` for one, `(a, b)` for two, and so on. Anything the
/// closure captures plays the role of the invocation context.
///
/// # Example
/// ```
/// use call_pacer::Action;
///
/// let add = |a: i32, b: i32| a + b;
/// assert_eq!(add.invoke((2, 3)), 5);
///
/// let ping = || "pong";
/// assert_eq!(ping.invoke(()), "pong");
/// ```
pub trait Action<Args> {
    /// Value returned by the action.
    type Output;

    /// Run the action with the given arguments.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_action {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Action<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_action!();
impl_action!(A1);
impl_action!(A1, A2);
impl_action!(A1, A2, A3);
impl_action!(A1, A2, A3, A4);
impl_action!(A1, A2, A3, A4, A5);
impl_action!(A1, A2, A3, A4, A5, A6);
