//! Widgets bound to state keys

use super::canvas::{Canvas, Position};
use crate::state::State;

/// Something drawable from the current state
pub trait Widget: Send + Sync {
    fn draw(&self, canvas: &mut dyn Canvas, state: &State);
}

/// Draws `label: value` (or just the value when the label is empty)
pub struct LabeledValue {
    key: String,
    label: String,
    position: Position,
}

impl LabeledValue {
    pub fn new(key: impl Into<String>, label: impl Into<String>, position: Position) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            position,
        }
    }
}

impl Widget for LabeledValue {
    fn draw(&self, canvas: &mut dyn Canvas, state: &State) {
        let Some(value) = state.get(&self.key) else {
            return;
        };
        let text = if self.label.is_empty() {
            value.to_string()
        } else {
            format!("{}: {}", self.label, value)
        };
        canvas.text(self.position, &text);
    }
}

/// Draws `<index+1>/<count> <page>` for the active page
pub struct PageIndicator {
    position: Position,
}

impl PageIndicator {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

impl Widget for PageIndicator {
    fn draw(&self, canvas: &mut dyn Canvas, state: &State) {
        let Some((index, count, name)) = state.page_info() else {
            return;
        };
        canvas.text(self.position, &format!("{}/{} {}", index + 1, count, name));
    }
}
