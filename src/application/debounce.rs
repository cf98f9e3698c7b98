//! Debounced wrapper around an action.
//!
//! Every call replaces the pending invocation with a new one scheduled
//! `delay` after that call. The pending invocation is a Tokio task sleeping
//! until its deadline; replacing it aborts the task, and a generation check
//! covers the window where the old task already woke up. A call that finds
//! the pending deadline already reached leaves that task running.
//!
//! Deadlines are always read from Tokio's clock, the same clock the timer
//! sleeps on, so paused test time drives both.

use crate::application::limiter::BuildError;
use crate::application::metrics::Metrics;
use crate::application::ports::Action;
use crate::domain::delay::Delay;
use crate::domain::policy::{DebounceSchedule, DebounceState, Generation};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant as TokioInstant};

/// A debounced action.
///
/// Cloning is cheap; clones share the same pending invocation and count as
/// the same wrapper instance. Dropping every clone does not cancel an
/// invocation that is already scheduled; call [`Debounced::cancel`] for that.
///
/// # Example
/// ```
/// use call_pacer::debounce;
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let last = Arc::new(Mutex::new(String::new()));
/// let sink = Arc::clone(&last);
/// let on_input = debounce(move |text: String| *sink.lock().unwrap() = text, 20).unwrap();
///
/// on_input.call(("h".to_string(),));
/// on_input.call(("he".to_string(),));
/// on_input.call(("hello".to_string(),));
///
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// assert_eq!(*last.lock().unwrap(), "hello");
/// # }
/// ```
pub struct Debounced<F, Args> {
    inner: Arc<DebounceInner<F>>,
    _args: PhantomData<fn(Args)>,
}

struct DebounceInner<F> {
    action: F,
    delay: Delay,
    slot: Mutex<PendingSlot>,
    metrics: Metrics,
    runtime: Handle,
}

/// The schedule plus the task currently waiting on it.
struct PendingSlot {
    schedule: DebounceSchedule,
    timer: Option<JoinHandle<()>>,
}

impl<F, Args> Debounced<F, Args>
where
    F: Action<Args> + Send + Sync + 'static,
    Args: Send + 'static,
{
    /// Build a debounced wrapper on the current Tokio runtime.
    ///
    /// # Errors
    /// Returns `BuildError::MissingRuntime` when called outside a runtime.
    pub(crate) fn new(action: F, delay: Delay, metrics: Metrics) -> Result<Self, BuildError> {
        let runtime = Handle::try_current().map_err(|_| BuildError::MissingRuntime)?;

        Ok(Self {
            inner: Arc::new(DebounceInner {
                action,
                delay,
                slot: Mutex::new(PendingSlot {
                    schedule: DebounceSchedule::new(delay.as_duration()),
                    timer: None,
                }),
                metrics,
                runtime,
            }),
            _args: PhantomData,
        })
    }

    /// Schedule the action with these arguments, replacing any pending call.
    ///
    /// The action runs on the runtime the wrapper was built on, `delay`
    /// after this call, unless another call or a cancel comes first.
    pub fn call(&self, args: Args) {
        let inner = &self.inner;
        inner.metrics.record_call();

        let mut slot = inner.slot();
        // Timer deadline is fixed here, not when the task is first polled
        let armed = slot.schedule.arm(TokioInstant::now().into_std());
        let deadline = TokioInstant::from_std(armed.deadline);

        // A previous timer that is already due is detached, not aborted
        if let Some(previous) = slot.timer.take() {
            if armed.superseded {
                previous.abort();
            }
        }
        if armed.superseded {
            inner.metrics.record_superseded();
            tracing::debug!(delay = %inner.delay, "debounced call superseded");
        }

        let task_inner = Arc::clone(inner);
        slot.timer = Some(inner.runtime.spawn(async move {
            sleep_until(deadline).await;
            task_inner.fire(armed.generation, args);
        }));
    }

    /// Return an event-handler closure that calls this wrapper.
    pub fn handler(&self) -> impl Fn(Args) + Clone + Send + Sync + 'static {
        let debounced = self.clone();
        move |args| debounced.call(args)
    }
}

impl<F, Args> Debounced<F, Args> {
    /// Discard the pending invocation.
    ///
    /// Returns true if one was pending.
    pub fn cancel(&self) -> bool {
        let inner = &self.inner;
        let mut slot = inner.slot();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        let cancelled = slot.schedule.cancel();
        if cancelled {
            inner.metrics.record_cancelled();
            tracing::debug!(delay = %inner.delay, "debounced call cancelled");
        }
        cancelled
    }

    /// Whether an invocation is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.inner.slot().schedule.is_pending()
    }

    /// Current state of the wrapper.
    pub fn state(&self) -> DebounceState {
        self.inner.slot().schedule.state()
    }

    /// The debounce delay.
    pub fn delay(&self) -> Delay {
        self.inner.delay
    }

    /// Metrics this wrapper records into.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }
}

impl<F> DebounceInner<F> {
    fn slot(&self) -> MutexGuard<'_, PendingSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("debounce state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn fire<Args>(&self, generation: Generation, args: Args)
    where
        F: Action<Args>,
    {
        {
            let mut slot = self.slot();
            if !slot.schedule.fire(generation) {
                return;
            }
            // Detach our own handle unless a newer call now owns the slot
            if !slot.schedule.is_pending() {
                slot.timer = None;
            }
        }

        self.metrics.record_execution();
        tracing::trace!(delay = %self.delay, "debounced action executing");
        let _ = self.action.invoke(args);
    }
}

impl<F, Args> Clone for Debounced<F, Args> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _args: PhantomData,
        }
    }
}

impl<F, Args> fmt::Debug for Debounced<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.delay())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
