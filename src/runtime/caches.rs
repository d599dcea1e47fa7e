//! Cache Bundle
//!
//! All seven per-type caches of a project, shared by every scene runtime
//! under it. Clearing the bundle is only legal when no scene is loaded;
//! that guard lives in the project runtime, which owns the scene set.

use crate::defs::ProjectDefinition;
use crate::storage::Storage;

use super::audio::AudioRuntime;
use super::font::FontRuntime;
use super::material::MaterialRuntime;
use super::model::ModelRuntime;
use super::script::ScriptRuntime;
use super::shader::ShaderRuntime;
use super::texture::TextureRuntime;
use super::Cache;

#[derive(Default)]
pub struct AssetCaches {
    pub models: Cache<ModelRuntime>,
    pub shaders: Cache<ShaderRuntime>,
    pub textures: Cache<TextureRuntime>,
    pub audio: Cache<AudioRuntime>,
    pub scripts: Cache<ScriptRuntime>,
    pub fonts: Cache<FontRuntime>,
    pub materials: Cache<MaterialRuntime>,
}

impl AssetCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total runtimes across all caches
    pub fn total_runtime_count(&self) -> usize {
        self.models.runtime_count()
            + self.shaders.runtime_count()
            + self.textures.runtime_count()
            + self.audio.runtime_count()
            + self.scripts.runtime_count()
            + self.fonts.runtime_count()
            + self.materials.runtime_count()
    }

    /// Drop every runtime in every cache. Caller enforces the no-loaded-
    /// scenes guard before getting here.
    pub fn clear_all(&mut self) {
        log::info!("caches: clearing {} runtime(s)", self.total_runtime_count());
        self.models.clear();
        self.shaders.clear();
        self.textures.clear();
        self.audio.clear();
        self.scripts.clear();
        self.fonts.clear();
        self.materials.clear();
    }

    /// Run pending reload flags across every cache
    pub fn process_reloads(&mut self, project: &ProjectDefinition, storage: &Storage) {
        self.models.process_reloads(project, storage);
        self.shaders.process_reloads(project, storage);
        self.textures.process_reloads(project, storage);
        self.audio.process_reloads(project, storage);
        self.scripts.process_reloads(project, storage);
        self.fonts.process_reloads(project, storage);
        self.materials.process_reloads(project, storage);
    }
}
