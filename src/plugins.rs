//! Plugin lifecycle interface
//!
//! Plugins receive lifecycle events from the agent and typically react by
//! updating the shared `State`. A panicking plugin is logged and skipped so
//! the remaining plugins still receive the event.

use crate::state::{keys, State};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// Lifecycle event dispatched to every plugin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Loaded,
    Ready,
    InternetAvailable,
    Disconnected,
    AiBestReward(f64),
}

/// Lifecycle hooks; every hook defaults to doing nothing
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn on_loaded(&self) {}

    fn on_ready(&self, _state: &State) {}

    fn on_internet_available(&self, _state: &State) {}

    fn on_disconnected(&self, _state: &State) {}

    fn on_ai_best_reward(&self, _state: &State, _reward: f64) {}
}

/// Registered plugins, dispatched in registration order
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: impl Plugin + 'static) {
        info!("Registered plugin: {}", plugin.name());
        self.plugins.push(Box::new(plugin));
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Deliver `event` to every plugin
    ///
    /// Returns how many plugins handled it without panicking.
    pub fn dispatch(&self, event: Event, state: &State) -> usize {
        debug!("Dispatching {:?} to {} plugin(s)", event, self.plugins.len());

        let mut handled = 0;
        for plugin in &self.plugins {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match event {
                Event::Loaded => plugin.on_loaded(),
                Event::Ready => plugin.on_ready(state),
                Event::InternetAvailable => plugin.on_internet_available(state),
                Event::Disconnected => plugin.on_disconnected(state),
                Event::AiBestReward(reward) => plugin.on_ai_best_reward(state, reward),
            }));

            match outcome {
                Ok(()) => handled += 1,
                Err(_) => error!("Plugin '{}' failed on {:?}", plugin.name(), event),
            }
        }
        handled
    }
}

/// Example plugin: logs every event and reports readiness in `status`
#[derive(Debug, Default)]
pub struct ExamplePlugin {
    running: AtomicBool,
}

impl ExamplePlugin {
    pub fn new() -> Self {
        debug!("example plugin created");
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Plugin for ExamplePlugin {
    fn name(&self) -> &str {
        "example"
    }

    fn on_loaded(&self) {
        debug!("example plugin loaded");
    }

    fn on_ready(&self, state: &State) {
        self.running.store(true, Ordering::SeqCst);
        info!("example plugin is running");
        state.set_as(&keys::STATUS, "example plugin is running".to_string());
    }

    fn on_internet_available(&self, _state: &State) {
        debug!("example plugin detected internet");
    }

    fn on_disconnected(&self, _state: &State) {
        self.running.store(false, Ordering::SeqCst);
        debug!("example plugin detected disconnect");
    }

    fn on_ai_best_reward(&self, _state: &State, reward: f64) {
        debug!("example plugin detected best reward: {}", reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{atomic::AtomicUsize, Arc};

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl Plugin for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_ai_best_reward(&self, state: &State, reward: f64) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            state.set("reward", reward);
        }
    }

    struct Broken;

    impl Plugin for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn on_ai_best_reward(&self, _state: &State, _reward: f64) {
            panic!("plugin failure");
        }
    }

    #[test]
    fn test_example_plugin_lifecycle() {
        let state = State::with_elements([("status", "")]);
        let mut registry = PluginRegistry::new();
        registry.register(ExamplePlugin::new());

        assert_eq!(registry.dispatch(Event::Loaded, &state), 1);
        assert_eq!(registry.dispatch(Event::Ready, &state), 1);
        assert_eq!(
            state.get_as(&keys::STATUS).as_deref(),
            Some("example plugin is running")
        );
        assert_eq!(registry.names(), vec!["example"]);
    }

    #[test]
    fn test_failing_plugin_is_isolated() {
        let state = State::with_elements([("reward", 0.0)]);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut registry = PluginRegistry::new();
        registry.register(Broken);
        registry.register(Counting {
            calls: calls.clone(),
        });

        let handled = registry.dispatch(Event::AiBestReward(0.75), &state);

        assert_eq!(handled, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.get_as(&crate::state::Key::<f64>::new("reward")), Some(0.75));
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let state = State::new();
        let mut registry = PluginRegistry::new();
        registry.register(Counting {
            calls: Arc::new(AtomicUsize::new(0)),
        });

        assert_eq!(registry.dispatch(Event::InternetAvailable, &state), 1);
        assert_eq!(registry.dispatch(Event::Disconnected, &state), 1);
        assert!(state.is_empty());
    }
}
