//! Scene Definitions
//!
//! A scene is a root entity tree plus the environment it runs in: gravity
//! for the physics world, a clear color for the viewport, and the camera
//! the scene starts with.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::{generate_uuid, EntityDefinition, TransformDef, Uuid};

/// Starting camera for a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDefinition {
    #[serde(default)]
    pub transform: TransformDef,
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
}

fn default_movement_speed() -> f32 {
    10.0
}

fn default_fov() -> f32 {
    60.0
}

impl Default for CameraDefinition {
    fn default() -> Self {
        Self {
            transform: TransformDef::default(),
            movement_speed: default_movement_speed(),
            fov_degrees: default_fov(),
        }
    }
}

/// Serializable description of one scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDefinition {
    #[serde(default = "generate_uuid")]
    pub uuid: Uuid,

    pub name: String,

    /// Root of the entity tree
    pub root: EntityDefinition,

    #[serde(default)]
    pub camera: CameraDefinition,

    /// Gravity for this scene's physics world
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],

    /// Viewport clear color
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

fn default_gravity() -> [f32; 3] {
    [0.0, -9.81, 0.0]
}

fn default_clear_color() -> [f32; 4] {
    [0.1, 0.1, 0.12, 1.0]
}

impl SceneDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: generate_uuid(),
            name: name.into(),
            root: EntityDefinition::new("root"),
            camera: CameraDefinition::default(),
            gravity: default_gravity(),
            clear_color: default_clear_color(),
        }
    }

    /// Total entity count of the definition tree
    pub fn entity_count(&self) -> usize {
        self.root.count_recursive()
    }
}
