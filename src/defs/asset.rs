//! Asset Definitions
//!
//! One serializable description per asset: a uuid, a display name, a
//! format hint, and type-specific attributes. Attributes are a tagged
//! enum rather than a class hierarchy, so dispatching on asset kind is a
//! match and a definition can never be "the wrong subclass".

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::{generate_uuid, Uuid};

/// The kinds of asset a project can contain.
///
/// The first seven are backed by a shared runtime cache; Path, Animation,
/// and Physics resolve directly into entity-owned state when a scene loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Model,
    Shader,
    Texture,
    Audio,
    Script,
    Font,
    Material,
    Path,
    Animation,
    Physics,
}

impl AssetType {
    pub const ALL: [AssetType; 10] = [
        AssetType::Model,
        AssetType::Shader,
        AssetType::Texture,
        AssetType::Audio,
        AssetType::Script,
        AssetType::Font,
        AssetType::Material,
        AssetType::Path,
        AssetType::Animation,
        AssetType::Physics,
    ];

    /// Display label for panels
    pub fn label(&self) -> &'static str {
        match self {
            AssetType::Model => "Model",
            AssetType::Shader => "Shader",
            AssetType::Texture => "Texture",
            AssetType::Audio => "Audio",
            AssetType::Script => "Script",
            AssetType::Font => "Font",
            AssetType::Material => "Material",
            AssetType::Path => "Path",
            AssetType::Animation => "Animation",
            AssetType::Physics => "Physics",
        }
    }
}

/// One keyframe of a transform animation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeyframeDef {
    /// Time of this keyframe in seconds from animation start
    pub time: f32,
    /// Position offset applied to the entity at this keyframe
    pub position: [f32; 3],
}

/// Collision shape for a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PhysicsShape {
    #[default]
    Box,
    Sphere,
}

/// Type-specific attributes, tagged by asset kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AssetAttributes {
    Model {
        /// Project-relative path to the mesh payload
        path: String,
        #[serde(default = "default_half_extents")]
        half_extents: [f32; 3],
    },
    Shader {
        vertex_path: String,
        fragment_path: String,
    },
    Texture {
        path: String,
    },
    Audio {
        path: String,
        #[serde(default)]
        looping: bool,
        #[serde(default = "default_volume")]
        volume: f32,
    },
    Script {
        path: String,
    },
    Font {
        path: String,
        #[serde(default = "default_font_size")]
        size: f32,
    },
    Material {
        /// Shader this material draws with
        shader: Uuid,
        #[serde(default)]
        diffuse_texture: Option<Uuid>,
        #[serde(default)]
        normal_texture: Option<Uuid>,
        #[serde(default = "default_color")]
        color: [f32; 4],
    },
    Path {
        waypoints: Vec<[f32; 3]>,
        #[serde(default = "default_path_speed")]
        speed: f32,
    },
    Animation {
        keyframes: Vec<KeyframeDef>,
        #[serde(default)]
        looping: bool,
    },
    Physics {
        #[serde(default)]
        shape: PhysicsShape,
        #[serde(default = "default_mass")]
        mass: f32,
        #[serde(default)]
        is_static: bool,
        #[serde(default = "default_half_extents")]
        half_extents: [f32; 3],
    },
}

fn default_half_extents() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

fn default_volume() -> f32 {
    1.0
}

fn default_font_size() -> f32 {
    16.0
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_path_speed() -> f32 {
    1.0
}

fn default_mass() -> f32 {
    1.0
}

impl AssetAttributes {
    /// The asset kind these attributes describe
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetAttributes::Model { .. } => AssetType::Model,
            AssetAttributes::Shader { .. } => AssetType::Shader,
            AssetAttributes::Texture { .. } => AssetType::Texture,
            AssetAttributes::Audio { .. } => AssetType::Audio,
            AssetAttributes::Script { .. } => AssetType::Script,
            AssetAttributes::Font { .. } => AssetType::Font,
            AssetAttributes::Material { .. } => AssetType::Material,
            AssetAttributes::Path { .. } => AssetType::Path,
            AssetAttributes::Animation { .. } => AssetType::Animation,
            AssetAttributes::Physics { .. } => AssetType::Physics,
        }
    }
}

/// Serializable description of one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDefinition {
    /// Stable identifier, referenced by entities and other assets
    #[serde(default = "generate_uuid")]
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// Format hint for the payload (e.g. "obj", "png", "rhai")
    #[serde(default)]
    pub format: String,

    /// Grouping label for the asset browser
    #[serde(default)]
    pub group: String,

    /// Type-specific attributes
    #[serde(flatten)]
    pub attributes: AssetAttributes,
}

impl AssetDefinition {
    pub fn new(name: impl Into<String>, attributes: AssetAttributes) -> Self {
        Self {
            uuid: generate_uuid(),
            name: name.into(),
            format: String::new(),
            group: String::new(),
            attributes,
        }
    }

    pub fn asset_type(&self) -> AssetType {
        self.attributes.asset_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_round_trip_through_json() {
        let def = AssetDefinition::new(
            "crate",
            AssetAttributes::Model {
                path: "models/crate.obj".to_string(),
                half_extents: [1.0, 2.0, 1.0],
            },
        );
        let json = serde_json::to_string(&def).unwrap();
        let back: AssetDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uuid, def.uuid);
        assert_eq!(back.asset_type(), AssetType::Model);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{
            "uuid": 42,
            "name": "beep",
            "type": "Audio",
            "path": "audio/beep.wav"
        }"#;
        let def: AssetDefinition = serde_json::from_str(json).unwrap();
        match def.attributes {
            AssetAttributes::Audio { looping, volume, .. } => {
                assert!(!looping);
                assert!((volume - 1.0).abs() < f32::EPSILON);
            }
            _ => panic!("expected audio attributes"),
        }
    }

    #[test]
    fn asset_type_matches_tag() {
        let json = r#"{"uuid": 7, "name": "s", "type": "Script", "path": "scripts/s.rhai"}"#;
        let def: AssetDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.asset_type(), AssetType::Script);
    }
}
