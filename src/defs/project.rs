//! Project Definitions
//!
//! The root of the JSON project format: every asset definition and every
//! scene definition in the project, plus which scene to start with. All
//! runtime lookups of "what does uuid X describe" land here.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::storage::Storage;

use super::{
    generate_uuid, AssetAttributes, AssetDefinition, AssetType, DefinitionError, EntityDefinition,
    SceneDefinition, Uuid,
};

/// File name of the project manifest inside a project directory
pub const PROJECT_FILE: &str = "project.json";

/// Serializable description of a whole project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDefinition {
    #[serde(default = "generate_uuid")]
    pub uuid: Uuid,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: String,

    /// Scene to load and activate when the project opens
    #[serde(default)]
    pub startup_scene: Option<Uuid>,

    #[serde(default)]
    pub assets: Vec<AssetDefinition>,

    #[serde(default)]
    pub scenes: Vec<SceneDefinition>,
}

impl ProjectDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: generate_uuid(),
            name: name.into(),
            description: String::new(),
            author: String::new(),
            startup_scene: None,
            assets: Vec::new(),
            scenes: Vec::new(),
        }
    }

    /// Parse a project from JSON and validate uuid uniqueness
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let def: ProjectDefinition =
            serde_json::from_str(json).map_err(|e| DefinitionError::Serialization(e.to_string()))?;
        def.validate()?;
        Ok(def)
    }

    /// Serialize to pretty JSON for saving
    pub fn to_json(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::Serialization(e.to_string()))
    }

    /// Load the project manifest from a project directory
    pub fn load(storage: &Storage) -> Result<Self, DefinitionError> {
        let json = storage.read_to_string(PROJECT_FILE)?;
        Self::from_json(&json)
    }

    /// Save the project manifest into a project directory
    pub fn save(&self, storage: &Storage) -> Result<(), DefinitionError> {
        let json = self.to_json()?;
        storage
            .write(PROJECT_FILE, json.as_bytes())
            .map_err(DefinitionError::from)
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        let mut seen = std::collections::HashSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.uuid) {
                return Err(DefinitionError::Validation(format!(
                    "duplicate asset uuid {}",
                    asset.uuid
                )));
            }
        }
        let mut scene_seen = std::collections::HashSet::new();
        for scene in &self.scenes {
            if !scene_seen.insert(scene.uuid) {
                return Err(DefinitionError::Validation(format!(
                    "duplicate scene uuid {}",
                    scene.uuid
                )));
            }
        }
        Ok(())
    }

    /// Look up an asset definition by uuid
    pub fn asset_definition(&self, uuid: Uuid) -> Option<&AssetDefinition> {
        self.assets.iter().find(|a| a.uuid == uuid)
    }

    /// Look up a scene definition by uuid
    pub fn scene_definition(&self, uuid: Uuid) -> Option<&SceneDefinition> {
        self.scenes.iter().find(|s| s.uuid == uuid)
    }

    /// All asset definitions of one kind, in declaration order
    pub fn assets_of_type(&self, kind: AssetType) -> impl Iterator<Item = &AssetDefinition> {
        self.assets.iter().filter(move |a| a.asset_type() == kind)
    }

    /// Build the starter project created for a fresh directory.
    ///
    /// One scene with a spinning crate driven by a script, a ground slab
    /// with a static physics body, and a full set of cached asset kinds so
    /// every editor panel has something to show.
    pub fn starter() -> Self {
        let shader = AssetDefinition::new(
            "basic shader",
            AssetAttributes::Shader {
                vertex_path: "shaders/basic.vert".to_string(),
                fragment_path: "shaders/basic.frag".to_string(),
            },
        );
        let texture = AssetDefinition::new(
            "checker texture",
            AssetAttributes::Texture {
                path: "textures/checker.png".to_string(),
            },
        );
        let material = AssetDefinition::new(
            "crate material",
            AssetAttributes::Material {
                shader: shader.uuid,
                diffuse_texture: Some(texture.uuid),
                normal_texture: None,
                color: [0.9, 0.7, 0.4, 1.0],
            },
        );
        let model = AssetDefinition::new(
            "crate model",
            AssetAttributes::Model {
                path: "models/crate.obj".to_string(),
                half_extents: [0.5, 0.5, 0.5],
            },
        );
        let script = AssetDefinition::new(
            "spin script",
            AssetAttributes::Script {
                path: "scripts/spin.rhai".to_string(),
            },
        );
        let physics = AssetDefinition::new(
            "crate body",
            AssetAttributes::Physics {
                shape: super::asset::PhysicsShape::Box,
                mass: 1.0,
                is_static: false,
                half_extents: [0.5, 0.5, 0.5],
            },
        );
        let ground_body = AssetDefinition::new(
            "ground body",
            AssetAttributes::Physics {
                shape: super::asset::PhysicsShape::Box,
                mass: 0.0,
                is_static: true,
                half_extents: [10.0, 0.5, 10.0],
            },
        );

        let mut crate_entity = EntityDefinition::new("crate");
        crate_entity.transform.position = [0.0, 4.0, 0.0];
        crate_entity.assets = vec![model.uuid, material.uuid, script.uuid, physics.uuid];

        let mut ground = EntityDefinition::new("ground");
        ground.transform.position = [0.0, -0.5, 0.0];
        ground.assets = vec![ground_body.uuid];

        let mut scene = SceneDefinition::new("main scene");
        scene.root.name = "root".to_string();
        scene.root.children.push(ground);
        scene.root.children.push(crate_entity);

        let mut project = ProjectDefinition::new("starter project");
        project.description = "Generated starter project".to_string();
        project.startup_scene = Some(scene.uuid);
        project.assets = vec![
            shader,
            texture,
            material,
            model,
            script,
            physics,
            ground_body,
        ];
        project.scenes = vec![scene];
        project
    }

    /// Write the payload files the starter project's assets reference
    pub fn write_starter_files(storage: &Storage) -> Result<(), DefinitionError> {
        storage.write("shaders/basic.vert", STARTER_VERTEX_SHADER.as_bytes())?;
        storage.write("shaders/basic.frag", STARTER_FRAGMENT_SHADER.as_bytes())?;
        storage.write("scripts/spin.rhai", STARTER_SCRIPT.as_bytes())?;
        storage.write("models/crate.obj", STARTER_MODEL.as_bytes())?;
        storage.write("textures/checker.png", STARTER_TEXTURE_PNG)?;
        Ok(())
    }
}

const STARTER_VERTEX_SHADER: &str = "#version 330 core\n\
layout(location = 0) in vec3 position;\n\
uniform mat4 mvp;\n\
void main() {\n\
    gl_Position = mvp * vec4(position, 1.0);\n\
}\n";

const STARTER_FRAGMENT_SHADER: &str = "#version 330 core\n\
out vec4 color;\n\
uniform vec4 tint;\n\
void main() {\n\
    color = tint;\n\
}\n";

const STARTER_SCRIPT: &str = "\
// Spin in place and report once on startup.\n\
fn on_init(entity) {\n\
    entity.log(\"crate script ready\");\n\
}\n\
\n\
fn on_update(entity, dt) {\n\
    entity.rotate(0.0, 45.0 * dt, 0.0);\n\
}\n";

const STARTER_MODEL: &str = "\
# unit cube\n\
v -0.5 -0.5 -0.5\nv 0.5 -0.5 -0.5\nv 0.5 0.5 -0.5\nv -0.5 0.5 -0.5\n\
v -0.5 -0.5 0.5\nv 0.5 -0.5 0.5\nv 0.5 0.5 0.5\nv -0.5 0.5 0.5\n\
f 1 2 3 4\nf 5 6 7 8\nf 1 2 6 5\nf 3 4 8 7\nf 1 4 8 5\nf 2 3 7 6\n";

/// 1x1 white PNG, enough for the texture runtime to decode
const STARTER_TEXTURE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8,
    0xFF, 0xFF, 0xFF, 0x7F, 0x00, 0x09, 0xFB, 0x03, 0xFD, 0xE3, 0x55, 0xF2, 0x9C, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn project_round_trips_through_json() {
        let project = ProjectDefinition::starter();
        let json = project.to_json().unwrap();
        let back = ProjectDefinition::from_json(&json).unwrap();
        assert_eq!(back.name, project.name);
        assert_eq!(back.assets.len(), project.assets.len());
        assert_eq!(back.scenes.len(), 1);
        assert_eq!(back.startup_scene, project.startup_scene);
    }

    #[test]
    fn duplicate_asset_uuid_is_rejected() {
        let mut project = ProjectDefinition::new("p");
        let mut a = AssetDefinition::new(
            "a",
            AssetAttributes::Texture {
                path: "t.png".to_string(),
            },
        );
        a.uuid = 7;
        let mut b = a.clone();
        b.name = "b".to_string();
        project.assets = vec![a, b];
        let json = serde_json::to_string(&project).unwrap();
        assert!(ProjectDefinition::from_json(&json).is_err());
    }

    #[test]
    fn save_then_load_from_storage() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        let project = ProjectDefinition::starter();
        project.save(&storage).unwrap();
        let back = ProjectDefinition::load(&storage).unwrap();
        assert_eq!(back.uuid, project.uuid);
    }

    #[test]
    fn starter_files_cover_starter_assets() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        ProjectDefinition::write_starter_files(&storage).unwrap();
        let project = ProjectDefinition::starter();
        for asset in &project.assets {
            match &asset.attributes {
                AssetAttributes::Model { path, .. }
                | AssetAttributes::Texture { path }
                | AssetAttributes::Script { path } => {
                    assert!(storage.exists(path), "missing payload {}", path);
                }
                AssetAttributes::Shader {
                    vertex_path,
                    fragment_path,
                } => {
                    assert!(storage.exists(vertex_path));
                    assert!(storage.exists(fragment_path));
                }
                _ => {}
            }
        }
    }
}
