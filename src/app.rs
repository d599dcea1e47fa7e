//! Application state and editor action handling
//!
//! Owns the project runtime and the editor state, and translates panel
//! actions into runtime lifecycle calls. Every outcome, success or
//! refusal, lands on the status line so the tool never fails silently.

use crate::defs::{AssetType, Uuid};
use crate::editor::{EditorAction, EditorState};
use crate::prefs::EditorPrefs;
use crate::runtime::{AssetRuntime, ProjectRuntime, SceneState};

pub struct AppState {
    pub runtime: ProjectRuntime,
    pub editor: EditorState,
    pub prefs: EditorPrefs,
}

impl AppState {
    pub fn new(runtime: ProjectRuntime, prefs: EditorPrefs) -> Self {
        Self {
            runtime,
            editor: EditorState::new(),
            prefs,
        }
    }

    /// Apply a panel action through the runtime's public API.
    pub fn apply_action(&mut self, action: EditorAction, now: f64) {
        match action {
            EditorAction::None
            | EditorAction::SelectScene(_)
            | EditorAction::SelectEntity(_) => {}

            EditorAction::AddScene(uuid) => match self.runtime.add_scene_runtime(uuid) {
                Ok(_) => self.editor.set_status("scene queued for load", 2.0, now),
                Err(e) => self.editor.set_status(&format!("load failed: {}", e), 4.0, now),
            },

            EditorAction::ActivateScene(uuid) => {
                let state = self.runtime.scene_runtime(uuid).map(|s| s.state());
                match state {
                    Some(SceneState::Loaded) | Some(SceneState::Active) => {
                        match self.runtime.set_scene_runtime_as_active(uuid) {
                            Ok(()) => self.editor.set_status("scene activated", 2.0, now),
                            Err(e) => {
                                self.editor.set_status(&format!("activate failed: {}", e), 4.0, now)
                            }
                        }
                    }
                    _ => {
                        // Not materialized yet: queue it and activate once loaded
                        match self.runtime.add_scene_runtime(uuid) {
                            Ok(_) => {
                                self.runtime.queue_scene_activation(uuid);
                                self.editor.set_status("scene loading, will activate", 2.0, now);
                            }
                            Err(e) => self
                                .editor
                                .set_status(&format!("activate failed: {}", e), 4.0, now),
                        }
                    }
                }
            }

            EditorAction::DeactivateScene(uuid) => {
                match self.runtime.deactivate_scene_runtime(uuid) {
                    Ok(()) => self.editor.set_status("scene deactivated", 2.0, now),
                    Err(e) => self
                        .editor
                        .set_status(&format!("deactivate failed: {}", e), 4.0, now),
                }
            }

            EditorAction::DestroyScene(uuid) => match self.runtime.destroy_scene_runtime(uuid) {
                Ok(()) => self.editor.set_status("scene flagged for destroy", 2.0, now),
                Err(e) => self
                    .editor
                    .set_status(&format!("destroy failed: {}", e), 4.0, now),
            },

            EditorAction::ReloadAsset(kind, uuid) => {
                if self.flag_reload(kind, uuid) {
                    self.editor.set_status("asset flagged for reload", 2.0, now);
                } else {
                    self.editor.set_status("asset not in cache", 3.0, now);
                }
            }

            EditorAction::ClearCaches => match self.runtime.clear_all_caches() {
                Ok(()) => self.editor.set_status("caches cleared", 2.0, now),
                Err(e) => self.editor.set_status(&format!("clear refused: {}", e), 4.0, now),
            },
        }
    }

    fn flag_reload(&mut self, kind: AssetType, uuid: Uuid) -> bool {
        let caches = self.runtime.caches_mut();
        let shared = match kind {
            AssetType::Model => caches.models.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Shader => caches.shaders.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Texture => caches.textures.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Audio => caches.audio.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Script => caches.scripts.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Font => caches.fonts.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            AssetType::Material => caches.materials.get_mut_by_uuid(uuid).map(|r| r.shared_mut()),
            // These kinds resolve into entity-owned state, not caches
            AssetType::Path | AssetType::Animation | AssetType::Physics => None,
        };
        match shared {
            Some(shared) => {
                shared.set_reload_flag(true);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{AssetAttributes, AssetDefinition, ProjectDefinition, SceneDefinition};
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn app_with_scene() -> (TempDir, AppState, Uuid, Uuid) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("s.rhai", b"fn on_update(e, dt) {}").unwrap();

        let script = AssetDefinition::new(
            "s",
            AssetAttributes::Script {
                path: "s.rhai".to_string(),
            },
        );
        let script_uuid = script.uuid;
        let mut scene = SceneDefinition::new("scene");
        scene.root.assets.push(script_uuid);
        let scene_uuid = scene.uuid;

        let mut project = ProjectDefinition::new("p");
        project.assets.push(script);
        project.scenes.push(scene);

        let runtime = ProjectRuntime::new(project, storage);
        (
            dir,
            AppState::new(runtime, EditorPrefs::default()),
            scene_uuid,
            script_uuid,
        )
    }

    #[test]
    fn activate_on_unloaded_scene_queues_it() {
        let (_dir, mut app, scene_uuid, _) = app_with_scene();
        app.apply_action(EditorAction::ActivateScene(scene_uuid), 0.0);
        assert!(!app.runtime.has_active_scene());
        app.runtime
            .update_all(&crate::components::input::InputSnapshot::default(), 0.016);
        assert!(app.runtime.has_active_scene());
    }

    #[test]
    fn reload_action_sets_the_flag() {
        let (_dir, mut app, scene_uuid, script_uuid) = app_with_scene();
        app.apply_action(EditorAction::ActivateScene(scene_uuid), 0.0);
        app.runtime
            .update_all(&crate::components::input::InputSnapshot::default(), 0.016);

        app.apply_action(EditorAction::ReloadAsset(AssetType::Script, script_uuid), 0.0);
        let script = app
            .runtime
            .caches()
            .scripts
            .get_by_uuid(script_uuid)
            .unwrap();
        assert!(script.shared().reload_flag());
    }
}
