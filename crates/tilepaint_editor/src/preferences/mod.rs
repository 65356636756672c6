//! Editor preferences stored in the user's config directory

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tilepaint_core::DEFAULT_FILL_RADIUS;

use crate::commands::DEFAULT_HISTORY_LIMIT;
use crate::viewport::ZoomSettings;

/// Maximum number of recent projects remembered
pub const MAX_RECENT_PROJECTS: usize = 10;

/// A recently opened project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentProject {
    pub path: String,
    pub name: String,
}

/// User preferences persisted between sessions
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Zoom bounds and wheel step
    pub zoom: ZoomSettings,
    pub show_grid: bool,
    /// Grid line color as RGBA
    pub grid_color: [f32; 4],
    /// Half-width of the flood-fill search window, in cells
    pub fill_radius: u32,
    /// Number of undoable actions kept
    pub history_limit: usize,
    /// Reopen the most recent project on startup
    pub auto_open_last_project: bool,
    /// Most recent first
    pub recent_projects: Vec<RecentProject>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings::default(),
            show_grid: true,
            grid_color: [1.0, 1.0, 1.0, 0.2],
            fill_radius: DEFAULT_FILL_RADIUS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            auto_open_last_project: false,
            recent_projects: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Move `path` to the front of the recent list
    pub fn add_recent_project(&mut self, path: PathBuf, name: String) {
        let path = path.to_string_lossy().to_string();
        self.recent_projects.retain(|recent| recent.path != path);
        self.recent_projects.insert(0, RecentProject { path, name });
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    pub fn remove_recent_project(&mut self, path: &str) {
        self.recent_projects.retain(|recent| recent.path != path);
    }

    pub fn clear_recent_projects(&mut self) {
        self.recent_projects.clear();
    }

    /// Project to reopen on startup, if enabled
    pub fn last_project(&self) -> Option<PathBuf> {
        if !self.auto_open_last_project {
            return None;
        }
        self.recent_projects
            .first()
            .map(|recent| PathBuf::from(&recent.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_projects_most_recent_first() {
        let mut prefs = EditorPreferences::default();
        prefs.add_recent_project(PathBuf::from("a.json"), "a".into());
        prefs.add_recent_project(PathBuf::from("b.json"), "b".into());
        prefs.add_recent_project(PathBuf::from("a.json"), "a".into());
        let names: Vec<&str> = prefs.recent_projects.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        prefs.remove_recent_project("a.json");
        assert_eq!(prefs.recent_projects.len(), 1);
        prefs.clear_recent_projects();
        assert!(prefs.recent_projects.is_empty());
    }

    #[test]
    fn test_recent_projects_capped() {
        let mut prefs = EditorPreferences::default();
        for i in 0..15 {
            prefs.add_recent_project(PathBuf::from(format!("{i}.json")), format!("map {i}"));
        }
        assert_eq!(prefs.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(prefs.recent_projects[0].name, "map 14");
    }

    #[test]
    fn test_last_project_needs_auto_open() {
        let mut prefs = EditorPreferences::default();
        prefs.add_recent_project(PathBuf::from("cave.json"), "cave".into());
        assert_eq!(prefs.last_project(), None);
        prefs.auto_open_last_project = true;
        assert_eq!(prefs.last_project(), Some(PathBuf::from("cave.json")));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let prefs: EditorPreferences = serde_json::from_str(r#"{ "show_grid": false }"#).unwrap();
        assert!(!prefs.show_grid);
        assert_eq!(prefs.fill_radius, DEFAULT_FILL_RADIUS);
        assert_eq!(prefs.zoom, ZoomSettings::default());
    }
}
