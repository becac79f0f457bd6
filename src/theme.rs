//! Dark/light theme toggle.
//!
//! The preference lives under [`STORAGE_KEY`] in durable storage and is
//! reflected on the page as the [`DARK_CLASS`] marker class on the body.

use std::fmt;

use anyhow::Context as _;

use crate::document::{ClassList as _, Document};
use crate::storage::KeyValueStore;

/// Key used to persist the theme preference.
pub const STORAGE_KEY: &str = "theme";

/// Marker class on the body while dark mode is active.
pub const DARK_CLASS: &str = "theme-dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Interprets a persisted value. Only an exact `"dark"` selects dark mode;
    /// anything else, including a missing value, is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies the persisted preference once at page load.
///
/// Adds the dark class when the stored value is `"dark"`; otherwise leaves
/// the body untouched. Never writes to storage.
pub fn init_theme<D, S>(document: &D, storage: &S) -> anyhow::Result<Theme>
where
    D: Document + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let saved = stored_theme(storage)?;
    if saved == Theme::Dark {
        document.body()?.add_class(DARK_CLASS);
    }
    tracing::debug!(theme = %saved, "theme initialized");
    Ok(saved)
}

/// Flips dark mode on the body and persists the resulting theme.
pub fn toggle_theme<D, S>(document: &D, storage: &S) -> anyhow::Result<Theme>
where
    D: Document + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let dark = document.body()?.toggle_class(DARK_CLASS);
    let theme = Theme::from_dark(dark);
    storage
        .set_item(STORAGE_KEY, theme.as_str())
        .context("persist theme preference")?;
    tracing::debug!(%theme, "theme toggled");
    Ok(theme)
}

/// The theme currently shown, read from the body class.
pub fn current_theme<D: Document + ?Sized>(document: &D) -> anyhow::Result<Theme> {
    Ok(Theme::from_dark(document.body()?.has_class(DARK_CLASS)))
}

pub fn stored_theme<S: KeyValueStore + ?Sized>(storage: &S) -> anyhow::Result<Theme> {
    let saved = storage
        .get_item(STORAGE_KEY)
        .context("read theme preference")?;
    Ok(Theme::from_stored(saved.as_deref()))
}
