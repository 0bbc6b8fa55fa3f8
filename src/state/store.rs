//! State - In-memory UI state with dirty tracking and per-key listeners
//!
//! Every operation runs under one store-wide mutex. Listeners are invoked while
//! that mutex is held, so the `(previous, new)` pairs a listener observes for a
//! key always follow the real order of `set` calls on that key.

use super::types::{Element, FromValue, Key, Value};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

/// Callback invoked with `(previous, new)` when a key's value changes
pub type Listener = Box<dyn Fn(&Value, &Value) + Send + Sync>;

/// Data guarded by the store mutex
pub(super) struct Inner {
    /// Element storage by key
    pub(super) elements: HashMap<String, Element>,
    /// Keys in insertion order, for `items()` snapshots
    order: Vec<String>,
    /// Keys changed since the last `reset`
    dirty: HashSet<String>,
    /// At most one listener per key
    listeners: HashMap<String, Listener>,
}

impl Inner {
    fn new() -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            dirty: HashSet::new(),
            listeners: HashMap::new(),
        }
    }

    pub(super) fn value(&self, key: &str) -> Option<&Value> {
        self.elements.get(key).map(Element::value)
    }

    fn insert(&mut self, key: String, value: Value) {
        if self.elements.insert(key.clone(), Element { value }).is_none() {
            self.order.push(key.clone());
        }
        self.dirty.insert(key);
    }

    /// Store `value` under an existing key, notifying on change
    ///
    /// Returns `true` when the value changed. Compound operations call this
    /// while already holding the lock, so they never re-enter `State::set`.
    pub(super) fn set(&mut self, key: &str, value: Value) -> bool {
        let Some(element) = self.elements.get_mut(key) else {
            trace!("Ignoring set on undefined key '{}'", key);
            return false;
        };

        if element.value == value {
            return false;
        }

        let previous = std::mem::replace(&mut element.value, value);
        self.dirty.insert(key.to_string());

        if let Some(listener) = self.listeners.get(key) {
            notify(key, listener, &previous, &element.value);
        }

        true
    }
}

/// Run a listener, containing any panic it raises
///
/// The value change is already committed when this runs; a failing listener
/// is logged and otherwise ignored.
fn notify(key: &str, listener: &Listener, previous: &Value, new: &Value) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(previous, new)));
    if outcome.is_err() {
        error!(
            "Listener for '{}' panicked on {} → {}; change kept",
            key, previous, new
        );
    }
}

/// Thread-safe UI state store
///
/// Share it as `Arc<State>` between the renderer, plugins and input handling.
/// Missing keys never cause errors: reads return `None` and writes are ignored,
/// so every key has to be created with [`State::add_element`] first.
pub struct State {
    pub(super) inner: Mutex<Inner>,
}

impl State {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Create a store seeded with elements (all of them start dirty)
    pub fn with_elements<I, K, V>(elements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let state = Self::new();
        {
            let mut inner = state.inner.lock();
            for (key, value) in elements {
                inner.insert(key.into(), value.into());
            }
        }
        state
    }

    /// Insert or overwrite an element and mark it changed
    ///
    /// Overwriting does not invoke the key's listener.
    pub fn add_element(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        debug!("Adding state element '{}'", key);
        self.inner.lock().insert(key, value.into());
    }

    /// Check whether an element exists
    pub fn has_element(&self, key: &str) -> bool {
        self.inner.lock().elements.contains_key(key)
    }

    /// Remove an element, returning whether it existed
    ///
    /// The key is marked changed only if it existed. Its listener is dropped
    /// together with it.
    pub fn remove_element(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.elements.remove(key).is_none() {
            return false;
        }

        inner.order.retain(|k| k != key);
        inner.listeners.remove(key);
        inner.dirty.insert(key.to_string());
        debug!("Removed state element '{}'", key);
        true
    }

    /// Get a copy of the current value, or `None` if the key is undefined
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().value(key).cloned()
    }

    /// Get a value converted through a typed key
    pub fn get_as<T: FromValue>(&self, key: &Key<T>) -> Option<T> {
        self.inner.lock().value(key.name()).and_then(T::from_value)
    }

    /// Set the value of an existing key
    ///
    /// When the new value differs from the previous one the key is marked
    /// changed and its listener runs before this returns. Undefined keys are
    /// ignored. Returns whether the value changed.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        self.inner.lock().set(key, value.into())
    }

    /// Set a value through a typed key
    pub fn set_as<T: Into<Value>>(&self, key: &Key<T>, value: T) -> bool {
        self.set(key.name(), value.into())
    }

    /// Read-modify-write an existing key in one critical section
    ///
    /// `f` sees the current value and returns the replacement, or `None` to
    /// leave it alone. The write goes through the same path as `set`, so dirty
    /// tracking and the listener apply. `f` runs under the store lock and must
    /// not call back into the store. Returns whether the value changed.
    pub fn update<F>(&self, key: &str, f: F) -> bool
    where
        F: FnOnce(&Value) -> Option<Value>,
    {
        let mut inner = self.inner.lock();
        let next = inner.value(key).and_then(f);
        match next {
            Some(value) => inner.set(key, value),
            None => false,
        }
    }

    /// Register the listener for `key`, replacing any previous one
    ///
    /// The listener only fires for future changes. It runs with the store lock
    /// held, so it must be fast, must not block, and must not call back into
    /// this store (the lock is not reentrant and the call would deadlock).
    /// Panics inside the listener are caught and logged.
    ///
    /// Returns `false` without registering when `key` is undefined.
    pub fn add_listener<F>(&self, key: &str, listener: F) -> bool
    where
        F: Fn(&Value, &Value) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        if !inner.elements.contains_key(key) {
            warn!("Not registering listener for undefined key '{}'", key);
            return false;
        }

        if inner
            .listeners
            .insert(key.to_string(), Box::new(listener))
            .is_some()
        {
            debug!("Replaced listener for '{}'", key);
        }
        true
    }

    /// Remove the listener for `key`, returning whether one was registered
    pub fn remove_listener(&self, key: &str) -> bool {
        self.inner.lock().listeners.remove(key).is_some()
    }

    /// Point-in-time snapshot of all elements, in insertion order
    pub fn items(&self) -> Vec<(String, Element)> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|key| {
                inner
                    .elements
                    .get(key)
                    .map(|element| (key.clone(), element.clone()))
            })
            .collect()
    }

    /// Keys changed since the last `reset`, excluding `ignore`
    ///
    /// Order is unspecified.
    pub fn changes(&self, ignore: &[&str]) -> Vec<String> {
        let inner = self.inner.lock();
        inner
            .dirty
            .iter()
            .filter(|key| !ignore.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// Whether any key changed since the last `reset`
    pub fn has_changes(&self) -> bool {
        !self.inner.lock().dirty.is_empty()
    }

    /// Clear the change set (values and listeners are untouched)
    pub fn reset(&self) {
        self.inner.lock().dirty.clear();
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.lock().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().elements.is_empty()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("State")
            .field("elements", &inner.elements.len())
            .field("dirty", &inner.dirty.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
