//! Project file save/load operations

use super::{Project, ProjectSnapshot};
use serde_json::error::Category;
use std::path::Path;
use thiserror::Error;
use tilepaint_core::{Cell, TilemapError};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not well-formed JSON
    #[error("Parse error: {0}")]
    Syntax(String),

    /// A field holds a value of the wrong JSON type
    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid cell key '{0}'")]
    InvalidCellKey(String),

    #[error("Layer '{layer}' lists cell {cell} more than once")]
    DuplicateCell { layer: String, cell: Cell },

    #[error("Duplicate layer id {0}")]
    DuplicateLayer(Uuid),

    #[error("Tile size must be at least 1 pixel")]
    ZeroTileSize,

    #[error("Project format version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The content is well-typed but refers to something inconsistent
    #[error("Invalid project: {0}")]
    Invalid(#[from] TilemapError),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("No file path set")]
    NoPath,
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        match e.classify() {
            Category::Data => ProjectError::TypeError(e.to_string()),
            Category::Io => ProjectError::Io(e.into()),
            Category::Syntax | Category::Eof => ProjectError::Syntax(e.to_string()),
        }
    }
}

impl Project {
    /// Parse a project from its JSON snapshot
    pub fn from_json(content: &str) -> Result<Self, ProjectError> {
        let snapshot: ProjectSnapshot = serde_json::from_str(content)?;
        Project::from_snapshot(snapshot)
    }

    /// Pretty-printed JSON snapshot of the project
    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| ProjectError::Serialize(e.to_string()))
    }

    /// Load project from file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path)?;
        let mut project = Project::from_json(&content)?;
        project.path = Some(path.to_path_buf());

        // Drop auto-tiles whose tiles vanished; marks the project dirty if any were removed
        project.validate_and_cleanup();

        bevy::log::info!(
            "Loaded project '{}' ({} layers) from {:?}",
            project.name,
            project.layers.len(),
            path
        );
        Ok(project)
    }

    /// Save project to file
    pub fn save(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = self.to_json()?;
        std::fs::write(path, content)?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;

        bevy::log::info!("Saved project to {:?}", path);
        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(ProjectError::NoPath)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandHistory;
    use tilepaint_core::{AssetRef, Cell, PaintKind, TileRef, Tileset};

    #[test]
    fn test_json_round_trip() {
        let mut project = Project::new("Cave", 8, 4, 4);
        let tileset = project.add_tileset(Tileset::new("Rock", 2));
        let layer = project.add_layer("Ground", PaintKind::Tile);
        project
            .paint_tile(
                Cell::new(0, 0),
                layer,
                AssetRef::Tile(TileRef::new(tileset, 1)),
                &mut CommandHistory::default(),
            )
            .unwrap();

        let json = project.to_json().unwrap();
        let loaded = Project::from_json(&json).unwrap();
        assert_eq!(loaded.layers, project.layers);
        assert_eq!(loaded.tile_size, 8);
    }

    #[test]
    fn test_wrong_field_type_is_type_error() {
        let json = r#"{
            "version": 1, "name": "Cave", "tile_size": 16, "width": 4, "height": 4,
            "layers": "not a list"
        }"#;
        assert!(matches!(
            Project::from_json(json),
            Err(ProjectError::TypeError(_))
        ));

        let json = r#"{
            "version": 1, "name": 7, "tile_size": 16, "width": 4, "height": 4,
            "layers": []
        }"#;
        assert!(matches!(
            Project::from_json(json),
            Err(ProjectError::TypeError(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_syntax_error() {
        assert!(matches!(
            Project::from_json("{ \"version\": "),
            Err(ProjectError::Syntax(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("tilepaint-{}.json", uuid::Uuid::new_v4()));
        let mut project = Project::new("Disk", 16, 2, 2);
        project.add_layer("Zones", PaintKind::Area);
        project.save(&path).unwrap();
        assert!(!project.is_dirty());
        assert_eq!(project.display_name(), path.file_stem().unwrap().to_str().unwrap());

        let loaded = Project::load(&path).unwrap();
        assert_eq!(loaded.layers, project.layers);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_current_without_path() {
        let mut project = Project::default();
        assert!(matches!(project.save_current(), Err(ProjectError::NoPath)));
    }
}
