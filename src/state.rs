//! State management module - observable key/value store backing the display
//!
//! This module provides the `State` store shared by the renderer, plugins and
//! input handling. It tracks which keys changed since the last frame, invokes
//! per-key listeners on value changes and implements circular page navigation
//! over the `pages` / `current_page` keys.

mod error;
mod pages;
mod store;
mod types;

pub use error::StateError;
pub use store::{Listener, State};
pub use types::{keys, Element, FromValue, Key, Value};
