//! Light/dark theme preference.
//!
//! The preference is loaded from and saved to an injected `ThemeStore`.
//! A missing or unrecognized stored value falls back to the caller's
//! default; failing to persist is logged and otherwise ignored.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("Unknown theme '{other}', expected 'light' or 'dark'"),
        }
    }
}

pub trait ThemeStore {
    fn load(&self) -> anyhow::Result<Option<String>>;
    fn save(&self, value: &str) -> anyhow::Result<()>;
}

/// Stores the preference as a one-word text file.
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read theme file {}", self.path.display()))?;
        Ok(Some(content))
    }

    fn save(&self, value: &str) -> anyhow::Result<()> {
        fs::write(&self.path, value)
            .with_context(|| format!("Failed to write theme file {}", self.path.display()))
    }
}

pub struct ThemePreference<S> {
    store: S,
    current: Theme,
}

impl<S: ThemeStore> ThemePreference<S> {
    pub fn load(store: S, fallback: Theme) -> Self {
        let current = match store.load() {
            Ok(Some(saved)) => saved.parse().unwrap_or(fallback),
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!("Could not read theme preference: {:#}", e);
                fallback
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn set(&mut self, theme: Theme) {
        self.current = theme;
        if let Err(e) = self.store.save(theme.as_str()) {
            tracing::warn!("Could not persist theme preference: {:#}", e);
        }
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled());
        self.current
    }
}
