//! WiFU UI - observable state store and display runtime
//!
//! The [`state::State`] store is the single source of truth for everything the
//! display shows. Producers (sensors, plugins, the console) call `set`, the
//! render loop asks for `changes` and redraws, and listeners react to value
//! changes synchronously.

pub mod cli;
pub mod config;
pub mod faces;
pub mod plugins;
pub mod state;
pub mod ui;

pub use state::{State, Value};
