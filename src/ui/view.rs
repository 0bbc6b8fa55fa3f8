//! View - redraws the active page when the state changed

use super::canvas::{Canvas, TextCanvas};
use super::widgets::Widget;
use crate::state::State;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Owns the canvas and the widgets of every page
pub struct View {
    state: Arc<State>,
    canvas: TextCanvas,
    /// Widgets drawn on every page
    global: Vec<Box<dyn Widget>>,
    /// Widgets per page identifier
    pages: HashMap<String, Vec<Box<dyn Widget>>>,
    /// Keys whose changes alone do not trigger a redraw
    ignore: Vec<String>,
}

impl View {
    pub fn new(state: Arc<State>, width: usize, height: usize) -> Self {
        Self {
            state,
            canvas: TextCanvas::new(width, height),
            global: Vec::new(),
            pages: HashMap::new(),
            ignore: Vec::new(),
        }
    }

    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    /// Add a widget drawn on every page
    pub fn add_widget(&mut self, widget: impl Widget + 'static) {
        self.global.push(Box::new(widget));
    }

    /// Add a widget drawn only while `page` is active
    pub fn add_page_widget(&mut self, page: impl Into<String>, widget: impl Widget + 'static) {
        self.pages
            .entry(page.into())
            .or_default()
            .push(Box::new(widget));
    }

    /// Do not redraw when `key` is the only thing that changed
    pub fn ignore(&mut self, key: impl Into<String>) {
        self.ignore.push(key.into());
    }

    /// Clear the change set and redraw if anything relevant changed
    ///
    /// The change set is cleared before drawing, so a write that lands while
    /// widgets are reading the state stays pending for the next frame.
    /// Returns the new frame, or `None` when nothing needed redrawing.
    pub fn render(&mut self) -> Option<String> {
        if !self.state.has_changes() {
            return None;
        }

        let ignore: Vec<&str> = self.ignore.iter().map(String::as_str).collect();
        let changed = self.state.changes(&ignore);
        if changed.is_empty() {
            return None;
        }

        trace!("Redrawing for {:?}", changed);
        self.state.reset();
        Some(self.draw())
    }

    /// Redraw unconditionally, leaving the change set untouched
    pub fn draw(&mut self) -> String {
        self.canvas.clear();

        for widget in &self.global {
            widget.draw(&mut self.canvas, &self.state);
        }

        if let Some(page) = self.state.current_page_name() {
            if let Some(widgets) = self.pages.get(&page) {
                for widget in widgets {
                    widget.draw(&mut self.canvas, &self.state);
                }
            }
        }

        self.canvas.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Canvas, LabeledValue};

    /// Draws `status`, then changes it as a concurrent producer would
    struct StatusThenWrite {
        next: &'static str,
    }

    impl Widget for StatusThenWrite {
        fn draw(&self, canvas: &mut dyn Canvas, state: &State) {
            if let Some(value) = state.get("status") {
                canvas.text((0, 0), &value.to_string());
            }
            state.set("status", self.next);
        }
    }

    fn make_view() -> View {
        let state = Arc::new(State::new());
        state.add_element("pages", vec!["main", "stats"]);
        state.add_element("current_page", 0);
        state.add_element("status", "idle");
        state.add_element("aps", 3);
        state.add_element("uptime", "00:00:00");

        let mut view = View::new(state, 20, 3);
        view.add_widget(LabeledValue::new("status", "", (0, 0)));
        view.add_page_widget("main", LabeledValue::new("uptime", "UP", (0, 1)));
        view.add_page_widget("stats", LabeledValue::new("aps", "APS", (0, 1)));
        view.ignore("uptime");
        view
    }

    #[test]
    fn test_render_then_reset() {
        let mut view = make_view();

        let frame = view.render().unwrap();
        assert_eq!(frame, "idle\nUP: 00:00:00\n");
        assert!(!view.state().has_changes());

        // Nothing changed since the last frame
        assert!(view.render().is_none());
    }

    #[test]
    fn test_render_follows_active_page() {
        let mut view = make_view();
        view.render();

        view.state().next_page();
        let frame = view.render().unwrap();
        assert_eq!(frame, "idle\nAPS: 3\n");
    }

    #[test]
    fn test_ignored_keys_do_not_trigger_redraw() {
        let mut view = make_view();
        view.render();

        view.state().set("uptime", "00:00:01");
        assert!(view.render().is_none());
        // The ignored change stays pending until something else redraws
        assert!(view.state().has_changes());

        view.state().set("status", "scanning");
        let frame = view.render().unwrap();
        assert_eq!(frame, "scanning\nUP: 00:00:01\n");
        assert!(!view.state().has_changes());
    }

    #[test]
    fn test_write_during_draw_triggers_next_frame() {
        let state = Arc::new(State::with_elements([("status", "idle")]));
        let mut view = View::new(state.clone(), 10, 1);
        view.add_widget(StatusThenWrite { next: "scanning" });

        assert_eq!(view.render().as_deref(), Some("idle"));
        assert_eq!(state.get("status"), Some("scanning".into()));
        assert!(state.has_changes());

        // The write made during the first frame shows up in the next one
        assert_eq!(view.render().as_deref(), Some("scanning"));
        assert!(!state.has_changes());
        assert!(view.render().is_none());
    }
}
