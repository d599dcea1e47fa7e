//! Material Runtime
//!
//! A material is pure cross-reference: which shader to draw with, which
//! textures to bind, and a tint color. The referenced shader and texture
//! runtimes live in their own caches; entities resolve them when they
//! resolve the material.

use crate::defs::{AssetAttributes, AssetDefinition, Uuid};
use crate::storage::Storage;

use super::{AssetRuntime, SharedRuntime};

pub struct MaterialRuntime {
    shared: SharedRuntime,
    shader: Uuid,
    diffuse_texture: Option<Uuid>,
    normal_texture: Option<Uuid>,
    color: [f32; 4],
}

impl MaterialRuntime {
    pub fn shader(&self) -> Uuid {
        self.shader
    }

    pub fn diffuse_texture(&self) -> Option<Uuid> {
        self.diffuse_texture
    }

    pub fn normal_texture(&self) -> Option<Uuid> {
        self.normal_texture
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    fn load_into(&mut self, definition: &AssetDefinition) {
        let AssetAttributes::Material {
            shader,
            diffuse_texture,
            normal_texture,
            color,
        } = &definition.attributes
        else {
            self.shared.mark_failed("definition is not a material");
            return;
        };
        self.shader = *shader;
        self.diffuse_texture = *diffuse_texture;
        self.normal_texture = *normal_texture;
        self.color = *color;
        self.shared.mark_loaded();
    }
}

impl AssetRuntime for MaterialRuntime {
    fn load(definition: &AssetDefinition, _storage: &Storage) -> Self {
        let mut runtime = Self {
            shared: SharedRuntime::new(definition),
            shader: 0,
            diffuse_texture: None,
            normal_texture: None,
            color: [1.0; 4],
        };
        runtime.load_into(definition);
        runtime
    }

    fn reload(&mut self, definition: &AssetDefinition, _storage: &Storage) {
        self.shared.reset_for_reload();
        self.load_into(definition);
    }

    fn shared(&self) -> &SharedRuntime {
        &self.shared
    }

    fn shared_mut(&mut self) -> &mut SharedRuntime {
        &mut self.shared
    }
}
