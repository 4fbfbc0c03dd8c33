//! Display Theme & Preference Storage
//!
//! [`Theme`] selects which background variant the scene manager builds.
//! [`ThemeStore`] persists the user's choice between sessions; a
//! [`ThemePreference`] reads the store once at startup and writes it back on
//! every toggle.
//!
//! # Parsing policy
//!
//! - A missing or empty attribute means [`Theme::Dark`].
//! - `"dark"` (any case, surrounding whitespace ignored) means dark.
//! - Every other value falls back to [`Theme::Light`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parses a theme name. Unrecognised names select [`Theme::Light`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// Parses an optional theme attribute. Absent or blank means dark.
    #[must_use]
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Dark,
            Some(v) => Self::parse(v),
        }
    }

    /// The opposite theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Key-value persistence for the theme preference.
pub trait ThemeStore {
    /// Returns the stored theme, or `None` if nothing has been stored yet.
    fn load(&self) -> Option<Theme>;

    /// Stores `theme`, replacing any previous value.
    fn save(&mut self, theme: Theme) -> Result<()>;
}

/// Volatile store, used by tests and by hosts without persistent storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryThemeStore {
    value: Option<Theme>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        Self { value: Some(theme) }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Option<Theme> {
        self.value
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        self.value = Some(theme);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    theme: Theme,
}

/// JSON file store: `{ "theme": "dark" }`.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Option<Theme> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredPreference>(&text) {
            Ok(stored) => Some(stored.theme),
            Err(e) => {
                log::warn!("Ignoring unreadable theme preference {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        let text = serde_json::to_string(&StoredPreference { theme })?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// `window.localStorage` store for the web host.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageThemeStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageThemeStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ThemeStore for LocalStorageThemeStore {
    fn load(&self) -> Option<Theme> {
        let value = Self::storage()?.get_item(&self.key).ok().flatten()?;
        Some(Theme::parse(&value))
    }

    fn save(&mut self, theme: Theme) -> Result<()> {
        if let Some(storage) = Self::storage() {
            // Storage may be disabled (private browsing); the preference is
            // then simply not remembered.
            if storage.set_item(&self.key, theme.as_str()).is_err() {
                log::warn!("localStorage rejected theme preference");
            }
        }
        Ok(())
    }
}

// ============================================================================
// ThemePreference
// ============================================================================

/// Current theme plus the store it is mirrored into.
#[derive(Debug)]
pub struct ThemePreference<S: ThemeStore> {
    current: Theme,
    store: S,
}

impl<S: ThemeStore> ThemePreference<S> {
    /// Reads the store once; falls back to `default` when it is empty.
    pub fn load(store: S, default: Theme) -> Self {
        let current = store.load().unwrap_or(default);
        Self { current, store }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Sets the theme and persists it. A store failure is logged and the
    /// in-memory theme still changes.
    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        if let Err(e) = self.store.save(theme) {
            log::warn!("Failed to persist theme preference: {e}");
        }
        theme
    }

    /// Flips the theme, persists it and returns the new value.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
