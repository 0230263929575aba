#![forbid(unsafe_code)]

//! `localStorage` theme store and computed-style lookups.

use heartscope_core::chart::StyleSource;
use heartscope_core::theme::{StorageError, StorageResult, ThemeStore};
use web_sys::{Storage, Window};

fn local_storage() -> StorageResult<Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
}

/// Theme persistence in `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalThemeStore;

impl ThemeStore for LocalThemeStore {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(crate::js_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(crate::js_message(&e)))
    }
}

/// Reads CSS custom properties from the document element's computed style.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    window: Window,
}

impl ComputedStyle {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl StyleSource for ComputedStyle {
    fn css_var(&self, name: &str) -> Option<String> {
        let root = self.window.document()?.document_element()?;
        let style = self.window.get_computed_style(&root).ok().flatten()?;
        let value = style.get_property_value(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
