//! Area (zone marker) definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named zone painted onto area layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    /// Display color (hex format, e.g., "#3C3C50")
    pub color: String,
}

impl Area {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
        }
    }
}
