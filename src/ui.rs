//! Display module - text canvas, widgets and the render loop view
//!
//! Widgets read the shared `State`; the `View` redraws the active page only
//! when the store reports changes, then clears the change set.

mod canvas;
pub mod layout;
mod view;
mod widgets;

pub use canvas::{Canvas, Position, TextCanvas};
pub use view::View;
pub use widgets::{LabeledValue, PageIndicator, Widget};
