//! Default screen layout: the initial state elements and the widgets per page

use super::{LabeledValue, PageIndicator, View};
use crate::config::AppConfig;
use crate::faces::{FaceTable, Faces};
use crate::state::{keys, State, Value};
use std::sync::Arc;

/// Create the store with every well-known key plus configured extra elements
pub fn build_state(config: &AppConfig) -> State {
    let ui = &config.ui;
    let state = State::new();

    state.add_element(keys::FACE.name(), ui.initial_face.as_str());
    state.add_element(keys::PAGES.name(), ui.pages.clone());
    state.add_element(keys::CURRENT_PAGE.name(), 0);
    state.add_element(keys::STATUS.name(), "");
    state.add_element(keys::UPTIME.name(), "00:00:00");
    state.add_element(keys::CHANNEL.name(), Value::Null);
    state.add_element(keys::APS.name(), 0);

    for (key, value) in &ui.elements {
        state.add_element(key.clone(), value.clone());
    }

    state
}

/// Build the view: header and face on every page, details per page
///
/// `uptime` ticks every second, so it is drawn but never triggers a redraw by
/// itself.
pub fn build_view(config: &AppConfig, state: Arc<State>, faces: Arc<FaceTable>) -> View {
    let ui = &config.ui;
    let mut view = View::new(state, ui.width, ui.height);

    view.add_widget(LabeledValue::new(keys::CHANNEL.name(), "CH", (0, 0)));
    view.add_widget(LabeledValue::new(keys::APS.name(), "APS", (8, 0)));
    view.add_widget(PageIndicator::new((ui.width.saturating_sub(12), 0)));
    view.add_widget(Faces::new(faces, (0, 2)));
    view.add_widget(LabeledValue::new(
        keys::STATUS.name(),
        "",
        (0, ui.height.saturating_sub(1)),
    ));

    if let Some(first) = ui.pages.first() {
        view.add_page_widget(
            first.clone(),
            LabeledValue::new(keys::UPTIME.name(), "UP", (12, 2)),
        );
    }
    for page in ui.pages.iter().skip(1) {
        for (row, key) in ui.elements.keys().enumerate() {
            view.add_page_widget(
                page.clone(),
                LabeledValue::new(key.clone(), key.clone(), (12, 2 + row)),
            );
        }
    }

    view.ignore(keys::UPTIME.name());
    view
}
