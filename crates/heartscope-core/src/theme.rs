#![forbid(unsafe_code)]

//! Light/dark theme state with pluggable persistence.
//!
//! # Lifecycle
//!
//! 1. [`ThemeState::load`] reads the stored value once at startup. A missing
//!    or unrecognized value yields [`Theme::Light`].
//! 2. [`ThemeState::toggle`] is the only mutation. It flips the theme and
//!    writes it back; a failed write is logged and the toggle still stands.
//! 3. Consumers read [`ThemeState::current`] and pass it explicitly to the
//!    chart adapter.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | storage unavailable on load | `Light`, warning logged |
//! | unknown stored value | `Light`, warning logged |
//! | write fails on toggle | theme toggled in memory, warning logged |

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

/// Storage key used when none is configured.
pub const DEFAULT_THEME_KEY: &str = "theme";

/// Color scheme of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Errors from a key-value store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store cannot be reached (e.g. storage disabled by the browser).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The store refused the write (e.g. quota exceeded).
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal string key-value store for the theme flag.
pub trait ThemeStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// In-memory store for tests and hosts without persistent storage.
#[derive(Default)]
pub struct MemoryThemeStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.data.write() {
            guard.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl ThemeStore for MemoryThemeStore {
    fn name(&self) -> &str {
        "MemoryThemeStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Write("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl fmt::Debug for MemoryThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryThemeStore")
            .field("entries", &count)
            .finish()
    }
}

// ============================================================================
// ThemeState
// ============================================================================

/// Process-wide theme with a single mutation point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    key: String,
    current: Theme,
}

impl ThemeState {
    /// Read the persisted theme under `key`.
    pub fn load(store: &dyn ThemeStore, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match store.get(&key) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(store = store.name(), value = %raw, "unknown stored theme, using light");
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(err) => {
                tracing::warn!(store = store.name(), error = %err, "theme not readable, using light");
                Theme::Light
            }
        };
        tracing::debug!(theme = %current, "theme loaded");
        Self { key, current }
    }

    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flip the theme and persist it. Returns the new theme.
    pub fn toggle(&mut self, store: &dyn ThemeStore) -> Theme {
        self.current = self.current.toggled();
        if let Err(err) = store.set(&self.key, self.current.as_str()) {
            tracing::warn!(store = store.name(), error = %err, "theme not persisted");
        }
        self.current
    }
}
