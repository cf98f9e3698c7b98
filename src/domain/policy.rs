//! Call-shaping state machines.
//!
//! This module holds the pure timing logic behind the throttle and debounce
//! wrappers. Nothing here reads a clock or spawns a timer: callers pass the
//! current instant in, which keeps every transition deterministic and easy
//! to test.

use std::time::{Duration, Instant};

/// Decision made for a single call to a shaped action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDecision {
    /// Run the action now
    Execute,
    /// Drop the call without running the action
    Suppress,
}

impl CallDecision {
    /// Check if this decision is Execute.
    pub fn is_execute(&self) -> bool {
        matches!(self, CallDecision::Execute)
    }

    /// Check if this decision is Suppress.
    pub fn is_suppress(&self) -> bool {
        matches!(self, CallDecision::Suppress)
    }
}

/// State of a throttle gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// The next call executes immediately
    Ready,
    /// Calls are dropped until `until`
    CoolingDown {
        /// Instant at which the cooldown ends
        until: Instant,
    },
}

/// Leading-edge throttle.
///
/// The first call of a burst executes and opens a cooldown window of
/// `limit`. Calls inside the window are suppressed and never replayed. A call
/// at or after the end of the window executes and opens a new one.
///
/// # Example
/// ```
/// use call_pacer::ThrottleGate;
/// use std::time::{Duration, Instant};
///
/// let mut gate = ThrottleGate::new(Duration::from_millis(16));
/// let t0 = Instant::now();
///
/// assert!(gate.register_call(t0).is_execute());
/// assert!(gate.register_call(t0 + Duration::from_millis(5)).is_suppress());
/// assert!(gate.register_call(t0 + Duration::from_millis(10)).is_suppress());
/// assert!(gate.register_call(t0 + Duration::from_millis(20)).is_execute());
/// ```
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    limit: Duration,
    state: ThrottleState,
}

impl ThrottleGate {
    /// Create a gate in the `Ready` state.
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            state: ThrottleState::Ready,
        }
    }

    /// Register a call at `now` and decide whether it runs.
    pub fn register_call(&mut self, now: Instant) -> CallDecision {
        if let ThrottleState::CoolingDown { until } = self.state {
            if now < until {
                return CallDecision::Suppress;
            }
        }

        self.state = ThrottleState::CoolingDown {
            until: now + self.limit,
        };
        CallDecision::Execute
    }

    /// Current state as observed at `now`.
    ///
    /// A cooldown whose window has elapsed reports `Ready`.
    pub fn state_at(&self, now: Instant) -> ThrottleState {
        match self.state {
            ThrottleState::CoolingDown { until } if now >= until => ThrottleState::Ready,
            state => state,
        }
    }

    /// Return to `Ready`, ending any cooldown.
    pub fn reset(&mut self) {
        self.state = ThrottleState::Ready;
    }

    /// The cooldown window.
    pub fn limit(&self) -> Duration {
        self.limit
    }
}

/// State of a debounce schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing scheduled
    Idle,
    /// An invocation is scheduled for `deadline`
    Pending {
        /// Instant at which the pending invocation fires
        deadline: Instant,
    },
}

/// Identifies one arming of a debounce schedule.
///
/// A timer holds on to the generation it was armed with. When it fires, the
/// schedule only honours it if no newer call or cancellation happened since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Result of arming a debounce schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed {
    /// Generation the new timer must present when it fires
    pub generation: Generation,
    /// When the new timer should fire
    pub deadline: Instant,
    /// Whether a pending invocation was replaced
    pub superseded: bool,
}

/// Trailing-edge debounce schedule.
///
/// Every call re-arms the schedule `delay` after that call, replacing any
/// pending invocation, so a burst of calls closer together than `delay`
/// collapses into one invocation after the last of them.
///
/// A call arriving when the pending deadline has already been reached does
/// not replace it: that invocation is due and still runs, and the call opens
/// a new burst. Calls spaced `delay` or more apart therefore each run.
///
/// # Example
/// ```
/// use call_pacer::{DebounceSchedule, DebounceState};
/// use std::time::{Duration, Instant};
///
/// let mut schedule = DebounceSchedule::new(Duration::from_millis(250));
/// let t0 = Instant::now();
///
/// let first = schedule.arm(t0);
/// let second = schedule.arm(t0 + Duration::from_millis(50));
/// assert!(second.superseded);
///
/// // The first timer is stale and must not run the action
/// assert!(!schedule.fire(first.generation));
/// assert!(schedule.fire(second.generation));
/// assert_eq!(schedule.state(), DebounceState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct DebounceSchedule {
    delay: Duration,
    generation: u64,
    state: DebounceState,
    /// Generations whose deadline passed before a newer call arrived
    due: Vec<u64>,
}

impl DebounceSchedule {
    /// Create an idle schedule.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            state: DebounceState::Idle,
            due: Vec::new(),
        }
    }

    /// Register a call at `now`.
    ///
    /// Replaces a pending invocation whose deadline is still in the future.
    /// One whose deadline is at or before `now` stays firable.
    pub fn arm(&mut self, now: Instant) -> Armed {
        let superseded = match self.state {
            DebounceState::Pending { deadline } if deadline <= now => {
                self.due.push(self.generation);
                false
            }
            DebounceState::Pending { .. } => true,
            DebounceState::Idle => false,
        };
        self.generation = self.generation.wrapping_add(1);
        let deadline = now + self.delay;
        self.state = DebounceState::Pending { deadline };

        Armed {
            generation: Generation(self.generation),
            deadline,
            superseded,
        }
    }

    /// A timer armed with `generation` fired.
    ///
    /// Returns true if the action should run. Firing the latest generation
    /// moves the schedule back to `Idle`; firing one that was already due
    /// when a newer call arrived leaves the newer one pending. Stale
    /// generations leave the schedule untouched.
    pub fn fire(&mut self, generation: Generation) -> bool {
        if generation.0 == self.generation && self.is_pending() {
            self.state = DebounceState::Idle;
            return true;
        }
        if let Some(pos) = self.due.iter().position(|&g| g == generation.0) {
            self.due.swap_remove(pos);
            return true;
        }
        false
    }

    /// Drop the pending invocation, and any due one that has not run yet.
    ///
    /// Returns true if something was discarded.
    pub fn cancel(&mut self) -> bool {
        let had_due = !self.due.is_empty();
        self.due.clear();
        if self.state == DebounceState::Idle {
            return had_due;
        }
        // Invalidate the outstanding timer as well
        self.generation = self.generation.wrapping_add(1);
        self.state = DebounceState::Idle;
        true
    }

    /// Current state.
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Whether an invocation is pending.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// The debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_throttle_leading_edge() {
        let mut gate = ThrottleGate::new(ms(100));
        let now = Instant::now();

        assert_eq!(gate.register_call(now), CallDecision::Execute);
        assert_eq!(
            gate.state_at(now),
            ThrottleState::CoolingDown { until: now + ms(100) }
        );
    }

    #[test]
    fn test_throttle_scenario() {
        let mut gate = ThrottleGate::new(ms(16));
        let t0 = Instant::now();

        let decisions: Vec<CallDecision> = [0, 5, 10, 20]
            .iter()
            .map(|&t| gate.register_call(t0 + ms(t)))
            .collect();

        assert_eq!(
            decisions,
            vec![
                CallDecision::Execute,
                CallDecision::Suppress,
                CallDecision::Suppress,
                CallDecision::Execute,
            ]
        );
    }

    #[test]
    fn test_throttle_resumes_exactly_at_limit() {
        let mut gate = ThrottleGate::new(ms(50));
        let t0 = Instant::now();

        assert!(gate.register_call(t0).is_execute());
        assert!(gate.register_call(t0 + ms(49)).is_suppress());
        assert!(gate.register_call(t0 + ms(50)).is_execute());

        // Cooldown restarted from the second execution
        assert!(gate.register_call(t0 + ms(99)).is_suppress());
        assert!(gate.register_call(t0 + ms(100)).is_execute());
    }

    #[test]
    fn test_throttle_suppressed_calls_do_not_extend_cooldown() {
        let mut gate = ThrottleGate::new(ms(30));
        let t0 = Instant::now();

        assert!(gate.register_call(t0).is_execute());
        for t in (1..30).step_by(3) {
            assert!(gate.register_call(t0 + ms(t)).is_suppress());
        }
        assert!(gate.register_call(t0 + ms(30)).is_execute());
    }

    #[test]
    fn test_throttle_zero_limit_allows_everything() {
        let mut gate = ThrottleGate::new(Duration::ZERO);
        let now = Instant::now();

        for _ in 0..5 {
            assert!(gate.register_call(now).is_execute());
        }
    }

    #[test]
    fn test_throttle_state_reports_ready_after_window() {
        let mut gate = ThrottleGate::new(ms(10));
        let t0 = Instant::now();

        assert_eq!(gate.state_at(t0), ThrottleState::Ready);
        gate.register_call(t0);
        assert!(matches!(
            gate.state_at(t0 + ms(9)),
            ThrottleState::CoolingDown { .. }
        ));
        assert_eq!(gate.state_at(t0 + ms(10)), ThrottleState::Ready);
    }

    #[test]
    fn test_throttle_reset() {
        let mut gate = ThrottleGate::new(ms(1_000));
        let now = Instant::now();

        assert!(gate.register_call(now).is_execute());
        assert!(gate.register_call(now).is_suppress());

        gate.reset();
        assert_eq!(gate.state_at(now), ThrottleState::Ready);
        assert!(gate.register_call(now).is_execute());
    }

    #[test]
    fn test_debounce_arm_from_idle() {
        let mut schedule = DebounceSchedule::new(ms(250));
        let now = Instant::now();

        let armed = schedule.arm(now);
        assert!(!armed.superseded);
        assert_eq!(armed.deadline, now + ms(250));
        assert_eq!(
            schedule.state(),
            DebounceState::Pending {
                deadline: now + ms(250)
            }
        );
    }

    #[test]
    fn test_debounce_burst_only_last_fires() {
        let mut schedule = DebounceSchedule::new(ms(250));
        let t0 = Instant::now();

        let arms: Vec<Armed> = [0, 50, 100, 300]
            .iter()
            .map(|&t| schedule.arm(t0 + ms(t)))
            .collect();

        assert!(!arms[0].superseded);
        assert!(arms[1..].iter().all(|a| a.superseded));
        assert_eq!(arms[3].deadline, t0 + ms(550));

        for stale in &arms[..3] {
            assert!(!schedule.fire(stale.generation));
        }
        assert!(schedule.is_pending());
        assert!(schedule.fire(arms[3].generation));
        assert!(!schedule.is_pending());
    }

    #[test]
    fn test_debounce_fire_twice_runs_once() {
        let mut schedule = DebounceSchedule::new(ms(10));
        let armed = schedule.arm(Instant::now());

        assert!(schedule.fire(armed.generation));
        assert!(!schedule.fire(armed.generation));
    }

    #[test]
    fn test_debounce_separate_bursts() {
        let mut schedule = DebounceSchedule::new(ms(100));
        let t0 = Instant::now();

        let first = schedule.arm(t0);
        assert!(schedule.fire(first.generation));

        let second = schedule.arm(t0 + ms(150));
        assert!(!second.superseded);
        assert!(schedule.fire(second.generation));
    }

    #[test]
    fn test_debounce_call_exactly_at_deadline_keeps_due_invocation() {
        let mut schedule = DebounceSchedule::new(ms(100));
        let t0 = Instant::now();

        let first = schedule.arm(t0);
        let second = schedule.arm(t0 + ms(100));
        assert!(!second.superseded);
        assert_eq!(second.deadline, t0 + ms(200));

        // Both run, in either order
        assert!(schedule.fire(first.generation));
        assert!(schedule.is_pending());
        assert!(schedule.fire(second.generation));
        assert_eq!(schedule.state(), DebounceState::Idle);
        assert!(!schedule.fire(first.generation));
    }

    #[test]
    fn test_debounce_chain_of_due_invocations() {
        let mut schedule = DebounceSchedule::new(ms(10));
        let t0 = Instant::now();

        let arms: Vec<Armed> = [0, 10, 20]
            .iter()
            .map(|&t| schedule.arm(t0 + ms(t)))
            .collect();

        assert!(arms.iter().all(|a| !a.superseded));
        assert!(schedule.fire(arms[2].generation));
        assert!(schedule.fire(arms[0].generation));
        assert!(schedule.fire(arms[1].generation));
    }

    #[test]
    fn test_debounce_zero_delay_never_supersedes() {
        let mut schedule = DebounceSchedule::new(Duration::ZERO);
        let now = Instant::now();

        let first = schedule.arm(now);
        let second = schedule.arm(now);
        assert!(!second.superseded);
        assert!(schedule.fire(second.generation));
        assert!(schedule.fire(first.generation));
    }

    #[test]
    fn test_debounce_cancel_discards_due_invocation() {
        let mut schedule = DebounceSchedule::new(ms(100));
        let t0 = Instant::now();

        let first = schedule.arm(t0);
        let second = schedule.arm(t0 + ms(150));

        assert!(schedule.cancel());
        assert!(!schedule.fire(first.generation));
        assert!(!schedule.fire(second.generation));
    }

    #[test]
    fn test_debounce_cancel() {
        let mut schedule = DebounceSchedule::new(ms(100));
        let armed = schedule.arm(Instant::now());

        assert!(schedule.cancel());
        assert!(!schedule.cancel());
        assert!(!schedule.fire(armed.generation));
        assert_eq!(schedule.state(), DebounceState::Idle);
    }

    #[test]
    fn test_decision_helpers() {
        assert!(CallDecision::Execute.is_execute());
        assert!(!CallDecision::Execute.is_suppress());
        assert!(CallDecision::Suppress.is_suppress());
    }
}
