//! Definitions
//!
//! Serializable descriptions of a project and everything in it: assets,
//! scenes, and entity trees. Definitions are loaded from JSON, stay
//! immutable while runtimes reference them, and are the only thing the
//! project file format contains. Runtimes are built from these, never
//! serialized back.

pub mod asset;
pub mod entity;
pub mod project;
pub mod scene;

pub use asset::{AssetAttributes, AssetDefinition, AssetType};
pub use entity::EntityDefinition;
pub use project::ProjectDefinition;
pub use scene::SceneDefinition;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::math::Transform;
use macroquad::math::Vec3;

/// Stable identifier for definitions and the runtimes built from them.
///
/// Survives renames and edits. References between definitions (an entity
/// naming its model, a material naming its shader) are always by uuid.
pub type Uuid = u64;

/// Counter folded into generated uuids for in-session uniqueness
static UUID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh uuid.
///
/// Combines an atomic counter with the wall clock so ids stay unique
/// within a session and are very unlikely to collide across launches.
pub fn generate_uuid() -> Uuid {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    UUID_COUNTER.fetch_add(1, Ordering::SeqCst).hash(&mut hasher);
    if let Ok(time) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        time.as_nanos().hash(&mut hasher);
    }
    hasher.finish()
}

/// Short hex form for display in panels and log lines
pub fn format_uuid(uuid: Uuid) -> String {
    format!("{:016x}", uuid)
}

/// Error type for definition loading and lookup
#[derive(Debug)]
pub enum DefinitionError {
    /// File I/O error
    Io(String),
    /// JSON parse or serialize error
    Serialization(String),
    /// Structural problem found after parsing (duplicate uuids etc.)
    Validation(String),
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::Io(msg) => write!(f, "I/O error: {}", msg),
            DefinitionError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            DefinitionError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for DefinitionError {}

impl From<std::io::Error> for DefinitionError {
    fn from(e: std::io::Error) -> Self {
        DefinitionError::Io(e.to_string())
    }
}

impl From<crate::storage::StorageError> for DefinitionError {
    fn from(e: crate::storage::StorageError) -> Self {
        DefinitionError::Io(e.to_string())
    }
}

/// Serialized transform: position, euler rotation in degrees, uniform scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransformDef {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl TransformDef {
    pub fn to_transform(&self) -> Transform {
        Transform {
            position: Vec3::from_array(self.position),
            rotation: Vec3::from_array(self.rotation),
            scale: self.scale,
        }
    }
}

impl Default for TransformDef {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_uuids_are_distinct() {
        let a = generate_uuid();
        let b = generate_uuid();
        assert_ne!(a, b);
    }

    #[test]
    fn transform_def_defaults_to_identity() {
        let def = TransformDef::default();
        let t = def.to_transform();
        assert_eq!(t, Transform::IDENTITY);
    }
}
