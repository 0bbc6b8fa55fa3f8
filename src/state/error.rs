use thiserror::Error;

/// Errors reported by the explicit (non-silent) state operations
///
/// The primitive operations (`get`, `set`, `next_page`, ...) never fail; they
/// degrade to no-ops. Only lookups that the caller asked to be checked, such as
/// `State::goto_page`, surface these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("State key '{key}' is not defined")]
    MissingKey { key: String },

    #[error("State key '{key}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Page index {index} out of range ({len} pages)")]
    PageOutOfRange { index: usize, len: usize },

    #[error("Page '{name}' not found")]
    PageNotFound { name: String },
}
