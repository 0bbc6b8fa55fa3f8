//! Face table and the face widget
//!
//! The `face` state key holds a face *name* (e.g. `"LOOK_R"`); the table maps
//! names to the glyph drawn on screen. Glyphs can be overridden per name from
//! the `ui.faces` configuration section.

use crate::state::{keys, State};
use crate::ui::{Canvas, Position, Widget};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Built-in glyphs by face name
pub const DEFAULT_FACES: &[(&str, &str)] = &[
    ("LOOK_R", "( ⚆_⚆)"),
    ("LOOK_L", "(☉_☉ )"),
    ("LOOK_R_HAPPY", "( ◕‿◕)"),
    ("LOOK_L_HAPPY", "(◕‿◕ )"),
    ("SLEEP", "(⇀‿‿↼)"),
    ("SLEEP2", "(≖‿‿≖)"),
    ("AWAKE", "(◕‿‿◕)"),
    ("BORED", "(-__-)"),
    ("INTENSE", "(°▃▃°)"),
    ("COOL", "(⌐■_■)"),
    ("HAPPY", "(•‿‿•)"),
    ("GRATEFUL", "(^‿‿^)"),
    ("EXCITED", "(ᵔ◡◡ᵔ)"),
    ("MOTIVATED", "(☼‿‿☼)"),
    ("DEMOTIVATED", "(≖__≖)"),
    ("SMART", "(✜‿‿✜)"),
    ("LONELY", "(ب__ب)"),
    ("SAD", "(╥☁╥ )"),
    ("ANGRY", "(-_-')"),
    ("FRIEND", "(♥‿‿♥)"),
    ("BROKEN", "(☓‿‿☓)"),
    ("DEBUG", "(#__#)"),
    ("UPLOAD", "(1__0)"),
    ("UPLOAD1", "(1__1)"),
    ("UPLOAD2", "(0__1)"),
];

/// Mapping from face name to glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceTable {
    faces: BTreeMap<String, String>,
}

impl FaceTable {
    /// Table with the built-in glyphs
    pub fn new() -> Self {
        Self {
            faces: DEFAULT_FACES
                .iter()
                .map(|(name, glyph)| (name.to_string(), glyph.to_string()))
                .collect(),
        }
    }

    /// Built-in table with glyphs replaced from configuration
    ///
    /// Names are matched upper-cased. Names that are not built-in faces are
    /// skipped with a warning.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::new();
        for (name, glyph) in overrides {
            let name = name.to_uppercase();
            match table.faces.get_mut(&name) {
                Some(slot) => {
                    debug!("Face {} overridden: {}", name, glyph);
                    *slot = glyph.clone();
                }
                None => warn!("Ignoring override for unknown face '{}'", name),
            }
        }
        table
    }

    /// Glyph for a face name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.faces.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.faces.contains_key(name)
    }

    /// Face names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws the glyph of the current `face` state value
pub struct Faces {
    table: Arc<FaceTable>,
    position: Position,
}

impl Faces {
    pub fn new(table: Arc<FaceTable>, position: Position) -> Self {
        Self { table, position }
    }
}

impl Widget for Faces {
    fn draw(&self, canvas: &mut dyn Canvas, state: &State) {
        let Some(face) = state.get_as(&keys::FACE) else {
            return;
        };
        if let Some(glyph) = self.table.get(&face) {
            canvas.text(self.position, glyph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::TextCanvas;

    #[test]
    fn test_default_table() {
        let table = FaceTable::new();
        assert_eq!(table.len(), DEFAULT_FACES.len());
        assert_eq!(table.get("AWAKE"), Some("(◕‿‿◕)"));
        assert_eq!(table.get("awake"), None);
        assert!(table.names().any(|n| n == "UPLOAD2"));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("cool".to_string(), "(B-)".to_string());
        overrides.insert("unknown".to_string(), "(?_?)".to_string());

        let table = FaceTable::with_overrides(&overrides);

        assert_eq!(table.get("COOL"), Some("(B-)"));
        assert_eq!(table.get("LOOK_R"), Some("( ⚆_⚆)"));
        assert!(!table.contains("UNKNOWN"));
        assert_eq!(table.len(), DEFAULT_FACES.len());
    }

    #[test]
    fn test_faces_widget_draws_known_face() {
        let state = State::with_elements([("face", "COOL")]);
        let widget = Faces::new(Arc::new(FaceTable::new()), (1, 0));
        let mut canvas = TextCanvas::new(10, 1);

        widget.draw(&mut canvas, &state);
        assert_eq!(canvas.render(), " (⌐■_■)");

        // Unknown or non-text faces draw nothing
        canvas.clear();
        state.set("face", "NOT_A_FACE");
        widget.draw(&mut canvas, &state);
        state.set("face", 3);
        widget.draw(&mut canvas, &state);
        assert_eq!(canvas.render(), "");
    }
}
