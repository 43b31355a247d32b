//! Dark/light theme preference with write-through persistence
//!
//! The flag is stored as `"true"`/`"false"` in a single file. When no value
//! has been persisted yet, the default comes from the terminal's advertised
//! colors (`COLORFGBG`), falling back to dark.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted theme preference
#[derive(Debug, Clone)]
pub struct Theme {
    dark: bool,
    path: PathBuf,
}

impl Theme {
    /// Load the preference from disk, or derive the default
    pub fn load(path: &Path) -> Self {
        let dark = match fs::read_to_string(path) {
            Ok(saved) => saved.trim() == "true",
            Err(_) => default_dark(),
        };

        Self {
            dark,
            path: path.to_path_buf(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Flip the preference and persist it immediately
    ///
    /// Write-through: if persisting fails the in-memory flag is reverted so
    /// memory and disk never disagree.
    pub fn toggle(&mut self) -> Result<()> {
        self.dark = !self.dark;

        if let Err(e) = self.persist() {
            self.dark = !self.dark;
            return Err(e);
        }

        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, if self.dark { "true" } else { "false" })
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Default when nothing is persisted: trust the terminal's background hint
fn default_dark() -> bool {
    std::env::var("COLORFGBG")
        .map(|v| colorfgbg_is_dark(&v))
        .unwrap_or(true)
}

/// Interpret a `COLORFGBG` value like `"15;0"`
///
/// The last field is the background color code; 0-6 and 8 are the dark
/// palette entries.
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_theme_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("assess-tui-test-{}-{}", name, std::process::id()))
            .join("theme")
    }

    #[test]
    fn test_toggle_writes_through() {
        let path = temp_theme_path("write-through");
        let mut theme = Theme::load(&path);
        let initial = theme.is_dark();

        theme.toggle().unwrap();
        assert_eq!(theme.is_dark(), !initial);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            if !initial { "true" } else { "false" }
        );

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_double_toggle_restores_default() {
        let path = temp_theme_path("double-toggle");
        let mut theme = Theme::load(&path);
        let initial = theme.is_dark();

        theme.toggle().unwrap();
        theme.toggle().unwrap();
        assert_eq!(theme.is_dark(), initial);

        // The persisted value and a fresh load agree with the default
        let reloaded = Theme::load(&path);
        assert_eq!(reloaded.is_dark(), initial);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_failed_persist_reverts_flag() {
        // Parent "directory" is a regular file, so the write cannot succeed
        let dir = std::env::temp_dir()
            .join(format!("assess-tui-test-revert-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut theme = Theme::load(&blocker.join("theme"));
        let initial = theme.is_dark();

        assert!(theme.toggle().is_err());
        assert_eq!(theme.is_dark(), initial);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_persisted_value_overrides_default() {
        let path = temp_theme_path("persisted");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "true").unwrap();

        assert!(Theme::load(&path).is_dark());

        fs::write(&path, "false").unwrap();
        assert!(!Theme::load(&path).is_dark());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert!(colorfgbg_is_dark("15;0"));
        assert!(colorfgbg_is_dark("7;default;0"));
        assert!(colorfgbg_is_dark("15;8"));
        assert!(!colorfgbg_is_dark("0;15"));
        assert!(!colorfgbg_is_dark("0;7"));
        // Unparsable values lean dark
        assert!(colorfgbg_is_dark("default;default"));
        assert!(colorfgbg_is_dark(""));
    }
}
