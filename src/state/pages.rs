//! Page navigation over the `pages` / `current_page` keys
//!
//! Each navigation step reads both keys, computes the target index and writes
//! `current_page` inside a single critical section, so a concurrent change to
//! the page list can never produce an out-of-range index.

use super::error::StateError;
use super::store::Inner;
use super::types::{keys, Value};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
enum Step {
    Next,
    Prev,
}

impl Inner {
    /// Page count and active index, when both keys hold a usable position
    ///
    /// Empty page lists and out-of-range indices yield `None`.
    fn page_position(&self) -> Option<(usize, usize)> {
        let pages = self.value(keys::PAGES.name())?.as_list()?;
        let index = self.value(keys::CURRENT_PAGE.name())?.as_int()?;

        if pages.is_empty() {
            debug!("No pages defined, navigation ignored");
            return None;
        }
        if index < 0 || index as usize >= pages.len() {
            debug!(
                "Current page {} out of range ({} pages), navigation ignored",
                index,
                pages.len()
            );
            return None;
        }

        Some((pages.len(), index as usize))
    }

    fn page_list(&self) -> Result<&[Value], StateError> {
        let key = keys::PAGES.name();
        let value = self.value(key).ok_or_else(|| StateError::MissingKey {
            key: key.to_string(),
        })?;
        value.as_list().ok_or_else(|| StateError::TypeMismatch {
            key: key.to_string(),
            expected: "list",
            found: value.kind(),
        })
    }
}

impl super::State {
    /// Navigate to the next page (circular)
    ///
    /// Silently does nothing when `pages` or `current_page` is missing, the
    /// page list is empty, or the current index is out of range.
    pub fn next_page(&self) {
        self.step_page(Step::Next);
    }

    /// Navigate to the previous page (circular)
    ///
    /// Same no-op conditions as [`next_page`](Self::next_page).
    pub fn prev_page(&self) {
        self.step_page(Step::Prev);
    }

    fn step_page(&self, step: Step) {
        let mut inner = self.inner.lock();
        let Some((len, index)) = inner.page_position() else {
            return;
        };

        let target = match step {
            Step::Next => {
                if index < len - 1 {
                    index + 1
                } else {
                    0
                }
            }
            Step::Prev => {
                if index > 0 {
                    index - 1
                } else {
                    len - 1
                }
            }
        };

        debug!("{:?} page: {} → {}", step, index, target);
        inner.set(keys::CURRENT_PAGE.name(), Value::Int(target as i64));
    }

    /// Set the active page by index or name
    ///
    /// A numeric argument is an index; anything else is matched against the
    /// page identifiers, ignoring ASCII case.
    pub fn goto_page(&self, name_or_index: &str) -> Result<(), StateError> {
        let mut inner = self.inner.lock();
        let pages = inner.page_list()?;
        let len = pages.len();

        let index = match name_or_index.parse::<usize>() {
            Ok(index) if index < len => index,
            Ok(index) => return Err(StateError::PageOutOfRange { index, len }),
            Err(_) => pages
                .iter()
                .position(|page| page.to_string().eq_ignore_ascii_case(name_or_index))
                .ok_or_else(|| StateError::PageNotFound {
                    name: name_or_index.to_string(),
                })?,
        };
        let page_name = pages[index].to_string();

        let key = keys::CURRENT_PAGE.name();
        if !inner.elements.contains_key(key) {
            return Err(StateError::MissingKey {
                key: key.to_string(),
            });
        }

        inner.set(key, Value::Int(index as i64));
        info!("Active page: {}", page_name);
        Ok(())
    }

    /// Identifier of the active page, if the position is valid
    pub fn current_page_name(&self) -> Option<String> {
        self.page_info().map(|(_, _, name)| name)
    }

    /// Active index, page count and page identifier, read in one snapshot
    pub fn page_info(&self) -> Option<(usize, usize, String)> {
        let inner = self.inner.lock();
        let (len, index) = inner.page_position()?;
        let pages = inner.value(keys::PAGES.name())?.as_list()?;
        Some((index, len, pages[index].to_string()))
    }
}
