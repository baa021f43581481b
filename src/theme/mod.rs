//! Light/dark theme preference
//!
//! The chosen theme is persisted under [`THEME_KEY`] and mirrored onto the
//! document root as `data-theme`.

mod store;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use store::{FileStore, MemoryStore, PreferenceStore};

use crate::{Error, Result};

/// Preference key the theme is stored under
pub const THEME_KEY: &str = "papo-social-theme";

/// Root attribute the theme is mirrored onto
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Available themes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light
    #[default]
    Lemonade,
    /// Dark
    Forest,
    /// Follow the platform
    System,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lemonade => "lemonade",
            Self::Forest => "forest",
            Self::System => "system",
        }
    }

    /// The theme a toggle switches to
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Lemonade => Self::Forest,
            Self::Forest | Self::System => Self::Lemonade,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lemonade" => Ok(Self::Lemonade),
            "forest" => Ok(Self::Forest),
            "system" => Ok(Self::System),
            other => Err(Error::Validation(format!("unknown theme: {other}"))),
        }
    }
}

/// Something that exposes attributes on a document root
pub trait RootAttribute {
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// In-memory document root
#[derive(Debug, Default, Clone)]
pub struct DocumentRoot {
    attributes: BTreeMap<String, String>,
}

impl DocumentRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl RootAttribute for DocumentRoot {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

/// Current theme with persistence and root mirroring
#[derive(Debug)]
pub struct ThemeContext<S, R> {
    theme: Theme,
    store: S,
    root: R,
}

impl<S: PreferenceStore, R: RootAttribute> ThemeContext<S, R> {
    /// Restore the saved theme, falling back to `default` when nothing
    /// usable is stored
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read
    pub fn load(store: S, mut root: R, default: Theme) -> Result<Self> {
        let theme = match store.get(THEME_KEY)? {
            Some(saved) => saved.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %saved, "ignoring unknown saved theme");
                default
            }),
            None => default,
        };

        root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        Ok(Self { theme, store, root })
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Only `Forest` counts as dark
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Forest
    }

    /// Persist and apply a theme
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        self.theme = theme;
        tracing::debug!(theme = %theme, "theme applied");
        Ok(())
    }

    /// Switch between light and dark, returning the new theme
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn root(&self) -> &R {
        &self.root
    }
}
