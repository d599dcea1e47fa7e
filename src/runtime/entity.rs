//! Entity Runtime
//!
//! A live instance of an entity definition inside a loaded scene. The
//! entity resolves each asset it uses through the matching cache exactly
//! once at construction and keeps only the uuid as a non-owning handle;
//! the caches own every runtime. Path, Animation, and Physics
//! definitions become entity-owned state instead.
//!
//! A missing or broken asset reference is recorded on the entity and the
//! construction still succeeds, so one bad reference degrades one entity
//! rather than aborting the scene load.

#![allow(dead_code)]

use macroquad::math::Vec3;

use crate::components::animation::{AnimationState, PathFollower};
use crate::components::physics::PhysicsBody;
use crate::defs::{
    format_uuid, AssetDefinition, AssetType, EntityDefinition, ProjectDefinition, Uuid,
};
use crate::math::{BoundingBox, Transform};
use crate::storage::Storage;

use super::{AssetCaches, AssetRuntime};

pub struct EntityRuntime {
    uuid: Uuid,
    name: String,
    parent: Option<Uuid>,
    children: Vec<Uuid>,

    /// World-space transform, written by scripting, physics, animation
    pub transform: Transform,
    /// Position animations offset from; follows script-driven moves
    base_position: Vec3,
    pub bounding_box: BoundingBox,

    // Non-owning handles into the caches
    model: Option<Uuid>,
    material: Option<Uuid>,
    shader: Option<Uuid>,
    textures: Vec<Uuid>,
    script: Option<Uuid>,
    audio: Option<Uuid>,
    font: Option<Uuid>,

    // Entity-owned component state
    pub animation: Option<AnimationState>,
    pub path_follower: Option<PathFollower>,
    pub physics_body: Option<PhysicsBody>,

    load_errors: Vec<String>,
}

impl EntityRuntime {
    /// Instantiate a definition, resolving its asset references.
    ///
    /// `parent_position` is the already-constructed parent's world
    /// position; child positions in definitions are relative to it.
    pub fn from_definition(
        definition: &EntityDefinition,
        parent: Option<Uuid>,
        parent_position: Vec3,
        project: &ProjectDefinition,
        caches: &mut AssetCaches,
        storage: &Storage,
    ) -> Self {
        let mut transform = definition.transform.to_transform();
        transform.position += parent_position;

        let mut entity = Self {
            uuid: definition.uuid,
            name: definition.name.clone(),
            parent,
            children: Vec::new(),
            transform,
            base_position: transform.position,
            bounding_box: BoundingBox::UNIT,
            model: None,
            material: None,
            shader: None,
            textures: Vec::new(),
            script: None,
            audio: None,
            font: None,
            animation: None,
            path_follower: None,
            physics_body: None,
            load_errors: Vec::new(),
        };

        for asset_uuid in &definition.assets {
            match project.asset_definition(*asset_uuid) {
                Some(asset) => entity.resolve_asset(asset, project, caches, storage),
                None => entity.record_error(format!(
                    "asset definition {} missing",
                    format_uuid(*asset_uuid)
                )),
            }
        }
        entity
    }

    fn resolve_asset(
        &mut self,
        asset: &AssetDefinition,
        project: &ProjectDefinition,
        caches: &mut AssetCaches,
        storage: &Storage,
    ) {
        match asset.asset_type() {
            AssetType::Model => {
                let runtime = caches.models.get_runtime(asset, storage);
                if runtime.shared().loaded() {
                    self.bounding_box = runtime.bounding_box();
                }
                self.set_slot("model", asset, |e| &mut e.model);
            }
            AssetType::Shader => {
                caches.shaders.get_runtime(asset, storage);
                self.set_slot("shader", asset, |e| &mut e.shader);
            }
            AssetType::Texture => {
                caches.textures.get_runtime(asset, storage);
                self.textures.push(asset.uuid);
            }
            AssetType::Audio => {
                caches.audio.get_runtime(asset, storage);
                self.set_slot("audio", asset, |e| &mut e.audio);
            }
            AssetType::Script => {
                caches.scripts.get_runtime(asset, storage);
                self.set_slot("script", asset, |e| &mut e.script);
            }
            AssetType::Font => {
                caches.fonts.get_runtime(asset, storage);
                self.set_slot("font", asset, |e| &mut e.font);
            }
            AssetType::Material => {
                let material = caches.materials.get_runtime(asset, storage);
                let shader_uuid = material.shader();
                let texture_uuids: Vec<Uuid> = material
                    .diffuse_texture()
                    .into_iter()
                    .chain(material.normal_texture())
                    .collect();
                self.set_slot("material", asset, |e| &mut e.material);

                // A material pulls its shader and textures into their own
                // caches as part of entity resolution.
                match project.asset_definition(shader_uuid) {
                    Some(shader_def) if shader_def.asset_type() == AssetType::Shader => {
                        caches.shaders.get_runtime(shader_def, storage);
                        if self.shader.is_none() {
                            self.shader = Some(shader_uuid);
                        }
                    }
                    _ => self.record_error(format!(
                        "material {} references missing shader {}",
                        asset.name,
                        format_uuid(shader_uuid)
                    )),
                }
                for texture_uuid in texture_uuids {
                    match project.asset_definition(texture_uuid) {
                        Some(texture_def) if texture_def.asset_type() == AssetType::Texture => {
                            caches.textures.get_runtime(texture_def, storage);
                            self.textures.push(texture_uuid);
                        }
                        _ => self.record_error(format!(
                            "material {} references missing texture {}",
                            asset.name,
                            format_uuid(texture_uuid)
                        )),
                    }
                }
            }
            AssetType::Path => match PathFollower::from_attributes(&asset.attributes) {
                Some(follower) => self.path_follower = Some(follower),
                None => self.record_error(format!("path {} has too few waypoints", asset.name)),
            },
            AssetType::Animation => match AnimationState::from_attributes(&asset.attributes) {
                Some(state) => self.animation = Some(state),
                None => self.record_error(format!("animation {} has no usable keyframes", asset.name)),
            },
            AssetType::Physics => match PhysicsBody::from_attributes(&asset.attributes) {
                Some(body) => self.physics_body = Some(body),
                None => self.record_error(format!("physics {} attributes invalid", asset.name)),
            },
        }
    }

    /// Fill a zero-or-one asset slot, keeping the first reference when a
    /// definition lists two of the same kind.
    fn set_slot(
        &mut self,
        label: &str,
        asset: &AssetDefinition,
        slot: impl Fn(&mut Self) -> &mut Option<Uuid>,
    ) {
        if slot(self).is_some() {
            log::warn!(
                "entity {}: duplicate {} reference {} ignored",
                self.name,
                label,
                asset.name
            );
            return;
        }
        *slot(self) = Some(asset.uuid);
    }

    fn record_error(&mut self, message: String) {
        log::warn!("entity {}: {}", self.name, message);
        self.load_errors.push(message);
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    pub fn children(&self) -> &[Uuid] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: Uuid) {
        self.children.push(child);
    }

    pub fn model(&self) -> Option<Uuid> {
        self.model
    }

    pub fn material(&self) -> Option<Uuid> {
        self.material
    }

    pub fn shader(&self) -> Option<Uuid> {
        self.shader
    }

    pub fn textures(&self) -> &[Uuid] {
        &self.textures
    }

    pub fn script(&self) -> Option<Uuid> {
        self.script
    }

    pub fn audio(&self) -> Option<Uuid> {
        self.audio
    }

    pub fn font(&self) -> Option<Uuid> {
        self.font
    }

    pub fn has_load_error(&self) -> bool {
        !self.load_errors.is_empty()
    }

    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }

    pub fn set_base_position(&mut self, position: Vec3) {
        self.base_position = position;
    }

    pub fn shift_base_position(&mut self, delta: Vec3) {
        self.base_position += delta;
    }

    /// Bounding box at the entity's current world position
    pub fn world_bounding_box(&self) -> BoundingBox {
        self.bounding_box
            .at(self.transform.position, self.transform.scale)
    }
}
