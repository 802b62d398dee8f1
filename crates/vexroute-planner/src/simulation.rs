//! Route simulation clock.
//!
//! Drives progress from 0 to 1 over the route's total timeout budget. The
//! clock never sleeps or spawns; the host owns the frame loop. Each frame
//! the host hands back the [`FrameToken`] it was given, and the clock
//! advances only if that token is still the pending one. Stopping forgets
//! the pending token, so a frame that was already queued does nothing.

use std::collections::VecDeque;

use tracing::{debug, trace};
use vexroute_core::{ListenerHandle, ListenerRegistry, SimulationListener, SimulationState};

use crate::waypoint::Waypoint;

/// Sum of every waypoint's timeout except the first.
pub fn total_duration_ms(waypoints: &[Waypoint]) -> u64 {
    waypoints
        .iter()
        .skip(1)
        .map(|w| u64::from(w.timeout_ms()))
        .sum()
}

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Source of animation frames (the host's `requestAnimationFrame`).
pub trait FrameScheduler {
    /// Ask for one more frame; the host later calls back with this token.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a requested frame. Hosts that cannot cancel may ignore this;
    /// the clock already treats the token as stale.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Deterministic scheduler that queues tokens until the host pops them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_token: u64,
    pending: VecDeque<FrameToken>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest queued frame.
    pub fn next_frame(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.pending.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}

/// Result of [`SimulationClock::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Already running; no second frame chain was scheduled
    AlreadyRunning,
    /// The route has no time budget, so there is nothing to animate
    CannotRun,
}

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub progress: f64,
    /// The run finished this frame; the simulated robot should be hidden.
    pub hide_agent: bool,
}

/// Idle/Running state machine over a progress value in `[0, 1]`.
#[derive(Debug)]
pub struct SimulationClock<S: FrameScheduler = ManualScheduler> {
    scheduler: S,
    state: SimulationState,
    progress: f64,
    duration_ms: u64,
    start_time_ms: Option<f64>,
    pending: Option<FrameToken>,
    listeners: ListenerRegistry,
}

impl Default for SimulationClock<ManualScheduler> {
    fn default() -> Self {
        Self::new(ManualScheduler::new())
    }
}

impl<S: FrameScheduler> SimulationClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: SimulationState::Idle,
            progress: 0.0,
            duration_ms: 0,
            start_time_ms: None,
            pending: None,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Duration captured by the last successful start.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn add_listener(&mut self, listener: Box<dyn SimulationListener>) -> ListenerHandle {
        self.listeners.register(listener)
    }

    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.unregister(handle)
    }

    /// Begin (or resume) animating over `total_duration_ms`.
    ///
    /// A clock that already reached the end restarts from 0; a paused clock
    /// continues from its held progress.
    pub fn start(&mut self, total_duration_ms: u64) -> StartOutcome {
        if self.is_running() {
            trace!("simulation start ignored, already running");
            return StartOutcome::AlreadyRunning;
        }
        if total_duration_ms == 0 {
            debug!("simulation cannot run: route has no duration");
            return StartOutcome::CannotRun;
        }
        if self.progress >= 1.0 {
            self.progress = 0.0;
        }

        self.duration_ms = total_duration_ms;
        self.start_time_ms = None;
        self.pending = Some(self.scheduler.request_frame());
        self.set_state(SimulationState::Running);
        debug!(
            duration_ms = total_duration_ms,
            progress = self.progress,
            "simulation started"
        );
        StartOutcome::Started
    }

    /// Advance for the frame identified by `token` at host time `now_ms`.
    ///
    /// Returns `None` for a stale token (cancelled, superseded, or arriving
    /// while idle); nothing changes in that case.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64) -> Option<FrameUpdate> {
        if !self.is_running() || self.pending != Some(token) {
            trace!(token = token.0, "stale frame ignored");
            return None;
        }
        self.pending = None;

        let duration = self.duration_ms as f64;
        // first frame anchors the clock so a resumed run keeps its progress
        let start = *self
            .start_time_ms
            .get_or_insert(now_ms - self.progress * duration);
        let elapsed = (now_ms - start).max(0.0);
        self.progress = (elapsed / duration).min(1.0);
        self.listeners.notify_progress(self.progress);

        if self.progress >= 1.0 {
            self.start_time_ms = None;
            self.set_state(SimulationState::Idle);
            self.listeners.notify_finished();
            debug!("simulation finished");
            return Some(FrameUpdate {
                progress: self.progress,
                hide_agent: true,
            });
        }

        self.pending = Some(self.scheduler.request_frame());
        Some(FrameUpdate {
            progress: self.progress,
            hide_agent: false,
        })
    }

    /// Stop at the current progress. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        self.start_time_ms = None;
        self.set_state(SimulationState::Idle);
        debug!(progress = self.progress, "simulation stopped");
        true
    }

    /// Same as [`Self::stop`]; progress is held for the next start.
    pub fn pause(&mut self) -> bool {
        self.stop()
    }

    /// Stop and rewind to the start of the route.
    pub fn reset(&mut self) {
        self.stop();
        self.progress = 0.0;
    }

    /// Jump to a progress while idle (scrubbing). Ignored while running.
    pub fn seek(&mut self, progress: f64) {
        if self.is_running() || progress.is_nan() {
            return;
        }
        self.progress = progress.clamp(0.0, 1.0);
    }

    fn set_state(&mut self, state: SimulationState) {
        if self.state != state {
            self.state = state;
            self.listeners.notify_state(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn run_frame(clock: &mut SimulationClock, now: f64) -> Option<FrameUpdate> {
        let token = clock.scheduler_mut().next_frame()?;
        clock.on_frame(token, now)
    }

    #[test]
    fn test_zero_duration_cannot_run() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.start(0), StartOutcome::CannotRun);
        assert_eq!(clock.state(), SimulationState::Idle);
        assert_eq!(clock.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_runs_to_completion() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.start(1000), StartOutcome::Started);

        let first = run_frame(&mut clock, 5000.0).unwrap();
        assert_eq!(first.progress, 0.0);
        assert!(!first.hide_agent);

        let mid = run_frame(&mut clock, 5500.0).unwrap();
        assert!((mid.progress - 0.5).abs() < 1e-12);

        let end = run_frame(&mut clock, 6200.0).unwrap();
        assert_eq!(end.progress, 1.0);
        assert!(end.hide_agent);
        assert_eq!(clock.state(), SimulationState::Idle);
        assert_eq!(clock.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_start_twice_does_not_double_schedule() {
        let mut clock = SimulationClock::default();
        clock.start(1000);
        assert_eq!(clock.start(1000), StartOutcome::AlreadyRunning);
        assert_eq!(clock.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut clock = SimulationClock::default();
        clock.start(1000);
        let token = clock.scheduler_mut().next_frame().unwrap();
        clock.on_frame(token, 0.0);
        let queued = clock.scheduler_mut().next_frame().unwrap();

        assert!(clock.stop());
        // a frame that was already in flight must be a no-op
        assert_eq!(clock.on_frame(queued, 500.0), None);
        assert_eq!(clock.progress(), 0.0);
        assert_eq!(clock.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_resume_keeps_progress() {
        let mut clock = SimulationClock::default();
        clock.start(1000);
        run_frame(&mut clock, 0.0);
        run_frame(&mut clock, 400.0);
        clock.pause();
        assert!((clock.progress() - 0.4).abs() < 1e-12);

        clock.start(1000);
        let resumed = run_frame(&mut clock, 10_000.0).unwrap();
        assert!((resumed.progress - 0.4).abs() < 1e-12);
        let later = run_frame(&mut clock, 10_100.0).unwrap();
        assert!((later.progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_restart_at_end_resets_progress() {
        let mut clock = SimulationClock::default();
        clock.start(100);
        run_frame(&mut clock, 0.0);
        run_frame(&mut clock, 100.0);
        assert_eq!(clock.progress(), 1.0);

        assert_eq!(clock.start(100), StartOutcome::Started);
        assert_eq!(clock.progress(), 0.0);
        let update = run_frame(&mut clock, 300.0).unwrap();
        assert_eq!(update.progress, 0.0);
        assert!(!update.hide_agent);
    }

    #[test]
    fn test_seek_and_reset() {
        let mut clock = SimulationClock::default();
        clock.seek(0.3);
        assert_eq!(clock.progress(), 0.3);
        clock.seek(7.0);
        assert_eq!(clock.progress(), 1.0);
        clock.reset();
        assert_eq!(clock.progress(), 0.0);
    }

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl SimulationListener for Recorder {
        fn on_progress(&self, progress: f64) {
            self.0.borrow_mut().push(format!("p{progress}"));
        }
        fn on_finished(&self) {
            self.0.borrow_mut().push("done".into());
        }
        fn on_state_changed(&self, state: SimulationState) {
            self.0.borrow_mut().push(state.name().into());
        }
    }

    #[test]
    fn test_listeners_observe_run() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut clock = SimulationClock::default();
        clock.add_listener(Box::new(Recorder(log.clone())));

        clock.start(10);
        run_frame(&mut clock, 0.0);
        run_frame(&mut clock, 10.0);

        assert_eq!(*log.borrow(), vec!["Running", "p0", "p1", "Idle", "done"]);
    }
}
