//! Preferences file save/load operations

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tilepaint", "tilepaint")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from file, returning defaults if not found
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                bevy::log::warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PreferencesError::ParseError(e.to_string()))
    }

    /// Save preferences to file
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save preferences to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::SerializeError(e.to_string()))?;
        std::fs::write(path, content)?;

        bevy::log::info!("Saved preferences to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tilepaint-{}-{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("tilepaint-prefs-{}", uuid::Uuid::new_v4()));
        let path = dir.join(PREFERENCES_FILE);

        let mut prefs = EditorPreferences::default();
        prefs.fill_radius = 40;
        prefs.add_recent_project(PathBuf::from("meadow.json"), "meadow".into());
        prefs.save_to(&path).unwrap();

        let loaded = EditorPreferences::load_from(&path).unwrap();
        assert_eq!(loaded, prefs);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = temp_file("none");
        assert_eq!(
            EditorPreferences::load_from(&path).unwrap(),
            EditorPreferences::default()
        );
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let path = temp_file("bad");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EditorPreferences::load_from(&path),
            Err(PreferencesError::ParseError(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
