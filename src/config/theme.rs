// src/config/theme.rs
//! Light/dark preference, persisted as `{"theme": "light" | "dark"}`.
//! A missing or unreadable file means `light`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
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

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => bail!("unknown theme '{other}' (expected light or dark)"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemePrefs {
    theme: Theme,
}

#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(s) => serde_json::from_str::<ThemePrefs>(&s)
                .map(|p| p.theme)
                .unwrap_or_default(),
            Err(_) => Theme::default(),
        }
    }

    /// Write via tmp file + rename so a crash never leaves half a file.
    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string(&ThemePrefs { theme })?;
        let mut f = fs::File::create(&tmp)
            .with_context(|| format!("creating {}", tmp.display()))?;
        f.write_all(json.as_bytes())?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("nope.json"));
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("prefs").join("theme.json"));
        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.load(), Theme::Dark);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"theme":"dark"}"#);
        assert_eq!(store.toggle().unwrap(), Theme::Light);
    }

    #[test]
    fn garbage_file_is_light() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("theme.json");
        fs::write(&p, r#"{"theme":"purple"}"#).unwrap();
        assert_eq!(ThemeStore::new(p).load(), Theme::Light);
    }

    #[test]
    fn parse_theme_names() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
