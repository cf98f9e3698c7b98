//! Throttled wrapper around an action.
//!
//! Runs the action on the leading edge of a burst and drops every call that
//! arrives during the cooldown that follows. Needs no runtime: the cooldown
//! is checked against a `Clock` when the next call arrives.

use crate::application::metrics::Metrics;
use crate::application::ports::{Action, Clock};
use crate::domain::delay::Delay;
use crate::domain::policy::{CallDecision, ThrottleGate, ThrottleState};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

/// A throttled action.
///
/// Cloning is cheap; clones share the same cooldown and count as the same
/// wrapper instance.
///
/// # Example
/// ```
/// use call_pacer::throttle;
///
/// let on_scroll = throttle(|top: u32| top * 2, 16).unwrap();
///
/// assert_eq!(on_scroll.call((10,)), Some(20)); // leading edge runs
/// assert_eq!(on_scroll.call((11,)), None);     // inside the cooldown, dropped
/// ```
pub struct Throttled<F, Args> {
    inner: Arc<ThrottleInner<F>>,
    _args: PhantomData<fn(Args)>,
}

struct ThrottleInner<F> {
    action: F,
    limit: Delay,
    gate: Mutex<ThrottleGate>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl<F, Args> Throttled<F, Args>
where
    F: Action<Args>,
{
    pub(crate) fn new(action: F, limit: Delay, clock: Arc<dyn Clock>, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(ThrottleInner {
                action,
                limit,
                gate: Mutex::new(ThrottleGate::new(limit.as_duration())),
                clock,
                metrics,
            }),
            _args: PhantomData,
        }
    }

    /// Call the action unless a cooldown is active.
    ///
    /// Returns the action's output when it ran and `None` when the call was
    /// dropped. The output is passed through untouched, and a panic inside
    /// the action unwinds through this call.
    pub fn call(&self, args: Args) -> Option<F::Output> {
        let inner = &self.inner;
        inner.metrics.record_call();

        let now = inner.clock.now();
        let decision = inner.gate().register_call(now);

        match decision {
            CallDecision::Execute => {
                inner.metrics.record_execution();
                tracing::trace!(limit = %inner.limit, "throttled action executing");
                Some(inner.action.invoke(args))
            }
            CallDecision::Suppress => {
                inner.metrics.record_dropped();
                tracing::debug!(limit = %inner.limit, "throttled call dropped");
                None
            }
        }
    }

    /// Return an event-handler closure that calls this wrapper.
    ///
    /// The closure discards the action's output.
    pub fn handler(&self) -> impl Fn(Args) + Clone + Send + Sync + 'static
    where
        F: Send + Sync + 'static,
        Args: 'static,
    {
        let throttled = self.clone();
        move |args| {
            throttled.call(args);
        }
    }
}

impl<F, Args> Throttled<F, Args> {
    /// End any cooldown so the next call runs immediately.
    pub fn reset(&self) {
        self.inner.gate().reset();
    }

    /// Current state of the wrapper.
    pub fn state(&self) -> ThrottleState {
        let now = self.inner.clock.now();
        self.inner.gate().state_at(now)
    }

    /// The cooldown window.
    pub fn limit(&self) -> Delay {
        self.inner.limit
    }

    /// Metrics this wrapper records into.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }
}

impl<F> ThrottleInner<F> {
    fn gate(&self) -> MutexGuard<'_, ThrottleGate> {
        self.gate.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("throttle state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<F, Args> Clone for Throttled<F, Args> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _args: PhantomData,
        }
    }
}

impl<F, Args> fmt::Debug for Throttled<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("limit", &self.limit())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
