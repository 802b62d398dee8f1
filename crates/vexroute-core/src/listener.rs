//! Simulation listener interface
//!
//! Defines the listener trait the simulation clock publishes progress
//! through, and a small registry that hands out removable handles.

use std::fmt;

use tracing::trace;

/// Run state of the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationState {
    /// Not animating; progress is held
    #[default]
    Idle,
    /// A frame chain is active
    Running,
}

impl SimulationState {
    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            SimulationState::Idle => "Idle",
            SimulationState::Running => "Running",
        }
    }
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle for a registered simulation listener.
///
/// Uniquely identifies a listener subscription. Can be used to unsubscribe
/// from simulation updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Listener trait for simulation updates
///
/// Implement this trait to redraw when the simulated robot moves.
pub trait SimulationListener {
    /// Called after every frame with the new progress in `[0, 1]`
    fn on_progress(&self, _progress: f64) {}

    /// Called once when progress reaches 1; the simulated robot should be hidden
    fn on_finished(&self) {}

    /// Called when the clock moves between idle and running
    fn on_state_changed(&self, _state: SimulationState) {}
}

/// Ordered set of listeners keyed by handle.
#[derive(Default)]
pub struct ListenerRegistry {
    next_handle: u64,
    listeners: Vec<(ListenerHandle, Box<dyn SimulationListener>)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is notified after all earlier registrations.
    pub fn register(&mut self, listener: Box<dyn SimulationListener>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, listener));
        trace!(handle = handle.0, "simulation listener registered");
        handle
    }

    /// Remove a listener. Returns false if the handle was not registered.
    pub fn unregister(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_progress(&self, progress: f64) {
        for (_, listener) in &self.listeners {
            listener.on_progress(progress);
        }
    }

    pub fn notify_finished(&self) {
        for (_, listener) in &self.listeners {
            listener.on_finished();
        }
    }

    pub fn notify_state(&self, state: SimulationState) {
        for (_, listener) in &self.listeners {
            listener.on_state_changed(state);
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl SimulationListener for Recorder {
        fn on_progress(&self, progress: f64) {
            self.0.borrow_mut().push(format!("progress {progress}"));
        }

        fn on_finished(&self) {
            self.0.borrow_mut().push("finished".to_string());
        }
    }

    #[test]
    fn test_register_and_notify() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry.register(Box::new(Recorder(log.clone())));

        registry.notify_progress(0.5);
        registry.notify_finished();

        assert_eq!(*log.borrow(), vec!["progress 0.5", "finished"]);
    }

    #[test]
    fn test_unregister_stops_notifications() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        let handle = registry.register(Box::new(Recorder(log.clone())));

        assert!(registry.unregister(handle));
        assert!(!registry.unregister(handle));
        registry.notify_progress(0.25);

        assert!(log.borrow().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut registry = ListenerRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = registry.register(Box::new(Recorder(log.clone())));
        let b = registry.register(Box::new(Recorder(log)));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
