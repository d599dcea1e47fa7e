//! Project Runtime
//!
//! Top-level owner of everything live for one open project: the seven
//! asset caches, the per-frame subsystems, and the set of scene
//! runtimes. Drives the whole frame: materialize pending scenes, process
//! asset reloads, update the active scene's subsystems in fixed order,
//! then garbage-collect scenes flagged for destruction.
//!
//! Subsystem faults are isolated per frame: a scripting error is
//! recorded on the frame profile and logged, and physics, animation,
//! audio, and graphics still run.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Instant;

use crate::components::animation::AnimationComponent;
use crate::components::audio::AudioComponent;
use crate::components::graphics::{DrawList, GraphicsComponent};
use crate::components::input::{InputComponent, InputSnapshot};
use crate::components::physics::PhysicsComponent;
use crate::components::scripting::ScriptingComponent;
use crate::components::{ComponentError, FrameProfile, Subsystem, Time};
use crate::defs::{format_uuid, ProjectDefinition, Uuid};
use crate::storage::Storage;

use super::{AssetCaches, RuntimeError, SceneRuntime, SceneState};

pub struct ProjectRuntime {
    definition: ProjectDefinition,
    storage: Storage,

    caches: AssetCaches,

    scenes: HashMap<Uuid, SceneRuntime>,
    scene_order: Vec<Uuid>,
    active_scene: Option<Uuid>,
    /// Scene to activate once it reaches `Loaded`
    pending_activation: Option<Uuid>,

    time: Time,
    input: InputComponent,
    scripting: ScriptingComponent,
    physics: PhysicsComponent,
    animation: AnimationComponent,
    audio: AudioComponent,
    graphics: GraphicsComponent,

    frame: FrameProfile,
}

impl ProjectRuntime {
    pub fn new(definition: ProjectDefinition, storage: Storage) -> Self {
        log::info!(
            "project {}: runtime constructed ({} asset(s), {} scene(s))",
            definition.name,
            definition.assets.len(),
            definition.scenes.len()
        );
        Self {
            definition,
            storage,
            caches: AssetCaches::new(),
            scenes: HashMap::new(),
            scene_order: Vec::new(),
            active_scene: None,
            pending_activation: None,
            time: Time::new(),
            input: InputComponent::new(),
            scripting: ScriptingComponent::new(),
            physics: PhysicsComponent::new(),
            animation: AnimationComponent::new(),
            audio: AudioComponent::new(),
            graphics: GraphicsComponent::new(),
            frame: FrameProfile::default(),
        }
    }

    /// Instantiate the definition's startup scene and queue it for
    /// activation once it materializes.
    pub fn open_startup_scene(&mut self) -> Result<(), RuntimeError> {
        let Some(uuid) = self.definition.startup_scene else {
            log::debug!("project {}: no startup scene", self.definition.name);
            return Ok(());
        };
        self.add_scene_runtime(uuid)?;
        self.queue_scene_activation(uuid);
        Ok(())
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Advance the whole project by one frame.
    pub fn update_all(&mut self, snapshot: &InputSnapshot, delta: f32) -> &FrameProfile {
        self.time.update(delta);
        self.frame = FrameProfile::begin(self.time.frame_number());

        self.materialize_pending_scenes();
        self.caches.process_reloads(&self.definition, &self.storage);
        self.apply_pending_activation();

        match self
            .active_scene
            .and_then(|uuid| self.scenes.get(&uuid).map(|s| (uuid, s.state())))
        {
            None => {
                // Nothing to update; the viewport draws the empty frame
                self.active_scene = None;
                self.graphics.clear();
            }
            Some((uuid, SceneState::ToDestroy)) => {
                // Teardown happens in the collection pass below; the scene
                // receives no subsystem updates this frame.
                log::debug!("scene {}: flagged for destroy, skipping update", format_uuid(uuid));
            }
            Some((uuid, SceneState::Active)) => {
                self.update_active_scene(uuid, snapshot, delta);
            }
            Some(_) => {}
        }

        self.collect_garbage();
        &self.frame
    }

    /// Run every subsystem against the active scene, in fixed order,
    /// isolating faults so each one runs regardless of the others.
    fn update_active_scene(&mut self, uuid: Uuid, snapshot: &InputSnapshot, delta: f32) {
        let frame = &mut self.frame;

        let start = Instant::now();
        let result = self.input.capture(snapshot);
        record_outcome(frame, Subsystem::Input, start, result);

        let Some(scene) = self.scenes.get_mut(&uuid) else {
            return;
        };

        let start = Instant::now();
        let result = self.scripting.update(scene, &mut self.caches, &self.time);
        record_outcome(frame, Subsystem::Scripting, start, result);

        let start = Instant::now();
        let result = self.physics.update(scene, &self.time);
        record_outcome(frame, Subsystem::Physics, start, result);

        let start = Instant::now();
        let result = self.animation.update(scene, &self.time);
        record_outcome(frame, Subsystem::Animation, start, result);

        let start = Instant::now();
        let result = self.audio.update(scene, &mut self.caches);
        record_outcome(frame, Subsystem::Audio, start, result);

        let start = Instant::now();
        let result = self.graphics.update(scene, &mut self.caches);
        record_outcome(frame, Subsystem::Graphics, start, result);

        scene.advance_time(delta as f64);
    }

    /// Build every scene still in `ToLoad`. A scene whose definition has
    /// vanished is flagged for destruction instead.
    fn materialize_pending_scenes(&mut self) {
        let pending: Vec<Uuid> = self
            .scene_order
            .iter()
            .copied()
            .filter(|uuid| {
                self.scenes
                    .get(uuid)
                    .map(|s| s.has_state(SceneState::ToLoad))
                    .unwrap_or(false)
            })
            .collect();

        for uuid in pending {
            let Some(scene) = self.scenes.get_mut(&uuid) else {
                continue;
            };
            match self.definition.scene_definition(uuid) {
                Some(scene_def) => {
                    if let Err(e) = scene.load_from_definition(
                        scene_def,
                        &self.definition,
                        &mut self.caches,
                        &self.storage,
                    ) {
                        log::error!("scene {}: load failed: {}", format_uuid(uuid), e);
                    }
                }
                None => {
                    log::error!(
                        "scene {}: definition missing, flagging for destroy",
                        format_uuid(uuid)
                    );
                    let _ = scene.set_state(SceneState::ToDestroy);
                }
            }
        }
    }

    fn apply_pending_activation(&mut self) {
        let Some(uuid) = self.pending_activation else {
            return;
        };
        match self.scenes.get(&uuid).map(|s| s.state()) {
            Some(SceneState::Loaded) => {
                self.pending_activation = None;
                if let Err(e) = self.set_scene_runtime_as_active(uuid) {
                    log::error!("scene {}: activation failed: {}", format_uuid(uuid), e);
                }
            }
            Some(_) => {}
            None => self.pending_activation = None,
        }
    }

    /// Destroy every scene flagged `ToDestroy` and drop it from the set.
    fn collect_garbage(&mut self) {
        let doomed: Vec<Uuid> = self
            .scene_order
            .iter()
            .copied()
            .filter(|uuid| {
                self.scenes
                    .get(uuid)
                    .map(|s| s.has_state(SceneState::ToDestroy))
                    .unwrap_or(false)
            })
            .collect();

        for uuid in doomed {
            if let Some(mut scene) = self.scenes.remove(&uuid) {
                let destroyed = scene.destroy();
                log::info!(
                    "scene {}: destroyed with {} entities",
                    scene.name(),
                    destroyed.len()
                );
            }
            self.scene_order.retain(|u| *u != uuid);
            if self.active_scene == Some(uuid) {
                self.active_scene = None;
                self.graphics.clear();
            }
            if self.pending_activation == Some(uuid) {
                self.pending_activation = None;
            }
            // Scripts remember per-entity init marks; a destroyed scene's
            // entities are gone, so the marks reset with it.
            for script in self.caches.scripts.runtimes_mut() {
                script.reset_initialized();
            }
        }
    }

    // =========================================================================
    // Scene management
    // =========================================================================

    /// Create a scene runtime (in `ToLoad`) for a scene definition. It
    /// materializes on the next update pass. Re-adding an existing scene
    /// is a no-op.
    pub fn add_scene_runtime(&mut self, scene_uuid: Uuid) -> Result<Uuid, RuntimeError> {
        if self.scenes.contains_key(&scene_uuid) {
            return Ok(scene_uuid);
        }
        let Some(scene_def) = self.definition.scene_definition(scene_uuid) else {
            return Err(RuntimeError::UnknownScene(scene_uuid));
        };
        let scene = SceneRuntime::new(scene_def);
        self.scene_order.push(scene_uuid);
        self.scenes.insert(scene_uuid, scene);
        Ok(scene_uuid)
    }

    /// Activate a loaded scene. Does not demote any other active scene:
    /// the previous scene keeps its state and simply stops being the one
    /// the update loop points at. Deactivate it explicitly if that is
    /// what you mean.
    pub fn set_scene_runtime_as_active(&mut self, uuid: Uuid) -> Result<(), RuntimeError> {
        let Some(scene) = self.scenes.get_mut(&uuid) else {
            return Err(RuntimeError::UnknownScene(uuid));
        };
        match scene.state() {
            SceneState::Loaded | SceneState::Active => {
                scene.set_state(SceneState::Active)?;
                if let Some(previous) = self.active_scene {
                    if previous != uuid {
                        log::warn!(
                            "scene {}: still active while {} takes over; deactivate it explicitly",
                            format_uuid(previous),
                            format_uuid(uuid)
                        );
                    }
                }
                self.active_scene = Some(uuid);
                Ok(())
            }
            state => Err(RuntimeError::SceneNotReady { uuid, state }),
        }
    }

    /// Explicitly deactivate a scene back to `Loaded`.
    pub fn deactivate_scene_runtime(&mut self, uuid: Uuid) -> Result<(), RuntimeError> {
        let Some(scene) = self.scenes.get_mut(&uuid) else {
            return Err(RuntimeError::UnknownScene(uuid));
        };
        scene.set_state(SceneState::Loaded)?;
        if self.active_scene == Some(uuid) {
            self.active_scene = None;
            self.graphics.clear();
        }
        Ok(())
    }

    /// Flag a scene for destruction; teardown happens on the next
    /// garbage-collection pass.
    pub fn destroy_scene_runtime(&mut self, uuid: Uuid) -> Result<(), RuntimeError> {
        let Some(scene) = self.scenes.get_mut(&uuid) else {
            return Err(RuntimeError::UnknownScene(uuid));
        };
        scene.set_state(SceneState::ToDestroy)
    }

    /// Queue a scene for activation as soon as it reaches `Loaded`
    pub fn queue_scene_activation(&mut self, uuid: Uuid) {
        self.pending_activation = Some(uuid);
    }

    pub fn has_active_scene(&self) -> bool {
        self.active_scene
            .map(|uuid| self.scenes.contains_key(&uuid))
            .unwrap_or(false)
    }

    pub fn active_scene_runtime(&self) -> Option<&SceneRuntime> {
        self.active_scene.and_then(|uuid| self.scenes.get(&uuid))
    }

    pub fn active_scene_runtime_mut(&mut self) -> Option<&mut SceneRuntime> {
        let uuid = self.active_scene?;
        self.scenes.get_mut(&uuid)
    }

    /// Scene runtimes in creation order
    pub fn scene_runtimes(&self) -> impl Iterator<Item = &SceneRuntime> {
        self.scene_order
            .iter()
            .filter_map(|uuid| self.scenes.get(uuid))
    }

    pub fn scene_runtime(&self, uuid: Uuid) -> Option<&SceneRuntime> {
        self.scenes.get(&uuid)
    }

    pub fn scene_runtime_mut(&mut self, uuid: Uuid) -> Option<&mut SceneRuntime> {
        self.scenes.get_mut(&uuid)
    }

    // =========================================================================
    // Caches
    // =========================================================================

    /// Drop every cached asset runtime. Refused with an error while any
    /// scene is loaded or active, since those scenes hold references
    /// into the caches.
    pub fn clear_all_caches(&mut self) -> Result<(), RuntimeError> {
        let in_use = self
            .scenes
            .values()
            .filter(|s| {
                s.has_state(SceneState::Loaded)
                    || s.has_state(SceneState::Active)
            })
            .count();
        if in_use > 0 {
            let error = RuntimeError::ScenesStillLoaded { count: in_use };
            log::error!("caches: clear refused: {}", error);
            return Err(error);
        }
        self.caches.clear_all();
        Ok(())
    }

    pub fn caches(&self) -> &AssetCaches {
        &self.caches
    }

    pub fn caches_mut(&mut self) -> &mut AssetCaches {
        &mut self.caches
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn definition(&self) -> &ProjectDefinition {
        &self.definition
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// What each subsystem did during the most recent frame
    pub fn frame_profile(&self) -> &FrameProfile {
        &self.frame
    }

    /// The draw list produced by the most recent graphics update
    pub fn draw_list(&self) -> &DrawList {
        self.graphics.draw_list()
    }

    pub fn input(&self) -> &InputSnapshot {
        self.input.current()
    }
}

fn record_outcome(
    frame: &mut FrameProfile,
    subsystem: Subsystem,
    start: Instant,
    result: Result<(), ComponentError>,
) {
    let millis = start.elapsed().as_secs_f32() * 1000.0;
    match result {
        Ok(()) => frame.record_ok(subsystem, millis),
        Err(e) => {
            log::error!("{}: fault isolated for this frame: {}", subsystem, e);
            frame.record_fault(subsystem, e.message, millis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{
        AssetAttributes, AssetDefinition, EntityDefinition, SceneDefinition,
    };
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        runtime: ProjectRuntime,
        scene_uuid: Uuid,
        model_uuid: Uuid,
    }

    /// Project with one model asset and a scene tree root -> {a, b},
    /// a -> {a1}; both a and b reference the model.
    fn fixture(extra_script: Option<&str>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        storage.write("m.obj", b"cube").unwrap();

        let model = AssetDefinition::new(
            "m",
            AssetAttributes::Model {
                path: "m.obj".to_string(),
                half_extents: [0.5; 3],
            },
        );
        let model_uuid = model.uuid;
        let mut assets = vec![model];

        let mut a = EntityDefinition::new("a");
        a.assets.push(model_uuid);
        a.children.push(EntityDefinition::new("a1"));
        let mut b = EntityDefinition::new("b");
        b.assets.push(model_uuid);

        if let Some(source) = extra_script {
            storage.write("s.rhai", source.as_bytes()).unwrap();
            let script = AssetDefinition::new(
                "s",
                AssetAttributes::Script {
                    path: "s.rhai".to_string(),
                },
            );
            a.assets.push(script.uuid);
            assets.push(script);
        }

        let mut scene = SceneDefinition::new("scene");
        scene.root.children.push(a);
        scene.root.children.push(b);
        let scene_uuid = scene.uuid;

        let mut project = ProjectDefinition::new("test project");
        project.assets = assets;
        project.scenes = vec![scene];
        project.startup_scene = Some(scene_uuid);

        let mut runtime = ProjectRuntime::new(project, storage);
        runtime.open_startup_scene().unwrap();
        Fixture {
            _dir: dir,
            runtime,
            scene_uuid,
            model_uuid,
        }
    }

    fn step(runtime: &mut ProjectRuntime) {
        runtime.update_all(&InputSnapshot::default(), 1.0 / 60.0);
    }

    #[test]
    fn startup_scene_materializes_and_activates_in_one_pass() {
        let mut f = fixture(None);
        assert!(!f.runtime.has_active_scene());
        step(&mut f.runtime);
        assert!(f.runtime.has_active_scene());
        let scene = f.runtime.active_scene_runtime().unwrap();
        assert_eq!(scene.uuid(), f.scene_uuid);
        assert_eq!(scene.state(), SceneState::Active);
        assert_eq!(scene.entity_count(), 4);
    }

    #[test]
    fn entities_load_parents_before_children() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        let scene = f.runtime.scene_runtime(f.scene_uuid).unwrap();
        let order = scene.entity_uuids();
        let index = |name: &str| {
            let uuid = scene.entity_by_name(name).unwrap().uuid();
            order.iter().position(|u| *u == uuid).unwrap()
        };
        assert!(index("root") < index("a"));
        assert!(index("root") < index("b"));
        assert!(index("a") < index("a1"));
    }

    #[test]
    fn destroy_runs_children_before_parents() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        let scene = f.runtime.scene_runtime_mut(f.scene_uuid).unwrap();
        let name_of = |scene: &SceneRuntime, uuid: Uuid| {
            scene.entity(uuid).map(|e| e.name().to_string())
        };
        let names: Vec<String> = {
            let order = scene.entity_uuids();
            let mut resolved = std::collections::HashMap::new();
            for uuid in order {
                if let Some(name) = name_of(scene, uuid) {
                    resolved.insert(uuid, name);
                }
            }
            scene
                .set_state(SceneState::ToDestroy)
                .and_then(|_| Ok(scene.destroy()))
                .unwrap()
                .into_iter()
                .map(|uuid| resolved.remove(&uuid).unwrap())
                .collect()
        };
        let index = |name: &str| names.iter().position(|n| n == name).unwrap();
        assert!(index("a1") < index("a"));
        assert!(index("a") < index("root"));
        assert!(index("b") < index("root"));
    }

    #[test]
    fn shared_model_constructs_exactly_once() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        assert_eq!(f.runtime.caches().models.runtime_count(), 1);
        assert_eq!(f.runtime.caches().models.constructions(), 1);
        let scene = f.runtime.scene_runtime(f.scene_uuid).unwrap();
        let a = scene.entity_by_name("a").unwrap();
        let b = scene.entity_by_name("b").unwrap();
        assert_eq!(a.model(), Some(f.model_uuid));
        assert_eq!(b.model(), Some(f.model_uuid));
    }

    #[test]
    fn activating_a_second_scene_moves_the_pointer_without_demotion() {
        let mut f = fixture(None);
        // Add a second scene definition after construction
        let mut second = SceneDefinition::new("second");
        second.root.name = "root2".to_string();
        let second_uuid = second.uuid;
        f.runtime.definition.scenes.push(second);
        f.runtime.add_scene_runtime(second_uuid).unwrap();
        step(&mut f.runtime);

        let first_uuid = f.scene_uuid;
        f.runtime.set_scene_runtime_as_active(first_uuid).unwrap();
        f.runtime.set_scene_runtime_as_active(second_uuid).unwrap();
        assert_eq!(
            f.runtime.active_scene_runtime().map(|s| s.uuid()),
            Some(second_uuid)
        );
        // The first scene is still in Active state; demotion is explicit
        assert_eq!(
            f.runtime.scene_runtime(first_uuid).unwrap().state(),
            SceneState::Active
        );

        f.runtime.deactivate_scene_runtime(first_uuid).unwrap();
        assert_eq!(
            f.runtime.scene_runtime(first_uuid).unwrap().state(),
            SceneState::Loaded
        );
        // Pointer unaffected by deactivating the non-pointed scene
        assert_eq!(
            f.runtime.active_scene_runtime().map(|s| s.uuid()),
            Some(second_uuid)
        );

        // Same sequence the other way around
        f.runtime.set_scene_runtime_as_active(first_uuid).unwrap();
        assert_eq!(
            f.runtime.active_scene_runtime().map(|s| s.uuid()),
            Some(first_uuid)
        );
    }

    #[test]
    fn activating_an_unloaded_scene_is_refused() {
        let mut f = fixture(None);
        // No update pass yet, scene is still ToLoad
        let err = f
            .runtime
            .set_scene_runtime_as_active(f.scene_uuid)
            .unwrap_err();
        match err {
            RuntimeError::SceneNotReady { state, .. } => {
                assert_eq!(state, SceneState::ToLoad)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn script_fault_does_not_stop_other_subsystems() {
        let mut f = fixture(Some("fn on_update(e, dt) { throw \"boom\"; }"));
        step(&mut f.runtime);
        let profile = f.runtime.frame_profile();
        assert!(profile.fault(Subsystem::Scripting).is_some());
        for subsystem in [
            Subsystem::Input,
            Subsystem::Physics,
            Subsystem::Animation,
            Subsystem::Audio,
            Subsystem::Graphics,
        ] {
            assert!(profile.ran(subsystem), "{} did not run", subsystem);
            assert!(profile.fault(subsystem).is_none());
        }
    }

    #[test]
    fn script_commands_move_entities() {
        let mut f = fixture(Some("fn on_update(e, dt) { e.translate(1.0, 0.0, 0.0); }"));
        step(&mut f.runtime);
        step(&mut f.runtime);
        let scene = f.runtime.scene_runtime(f.scene_uuid).unwrap();
        let a = scene.entity_by_name("a").unwrap();
        assert!(a.transform.position.x >= 2.0 - 0.001);
    }

    #[test]
    fn cache_clear_is_guarded_while_scenes_are_loaded() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        match f.runtime.clear_all_caches() {
            Err(RuntimeError::ScenesStillLoaded { count }) => assert_eq!(count, 1),
            other => panic!("expected guard error, got {:?}", other),
        }
        // Caches untouched by the refused clear
        assert_eq!(f.runtime.caches().models.runtime_count(), 1);

        f.runtime.destroy_scene_runtime(f.scene_uuid).unwrap();
        step(&mut f.runtime);
        assert!(f.runtime.scene_runtime(f.scene_uuid).is_none());
        assert!(f.runtime.clear_all_caches().is_ok());
        assert_eq!(f.runtime.caches().total_runtime_count(), 0);
    }

    #[test]
    fn destroyed_scene_leaves_the_set_and_clears_the_active_pointer() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        assert!(f.runtime.has_active_scene());
        f.runtime.destroy_scene_runtime(f.scene_uuid).unwrap();
        // Teardown happens within this pass; no subsystem updates run
        let profile = f.runtime.update_all(&InputSnapshot::default(), 1.0 / 60.0);
        assert!(!profile.ran(Subsystem::Graphics));
        assert!(!f.runtime.has_active_scene());
        assert_eq!(f.runtime.scene_runtimes().count(), 0);
    }

    #[test]
    fn missing_asset_reference_still_loads_the_scene() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());

        let mut entity = EntityDefinition::new("orphan");
        entity.assets.push(123456789);
        let mut scene = SceneDefinition::new("scene");
        scene.root.children.push(entity);
        let scene_uuid = scene.uuid;

        let mut project = ProjectDefinition::new("p");
        project.scenes = vec![scene];
        project.startup_scene = Some(scene_uuid);

        let mut runtime = ProjectRuntime::new(project, storage);
        runtime.open_startup_scene().unwrap();
        step(&mut runtime);

        let scene = runtime.scene_runtime(scene_uuid).unwrap();
        assert_eq!(scene.state(), SceneState::Active);
        let orphan = scene.entity_by_name("orphan").unwrap();
        assert!(orphan.has_load_error());
    }

    #[test]
    fn scene_time_advances_only_while_active() {
        let mut f = fixture(None);
        step(&mut f.runtime);
        step(&mut f.runtime);
        let after_two = f
            .runtime
            .scene_runtime(f.scene_uuid)
            .unwrap()
            .current_time();
        assert!(after_two > 0.0);

        f.runtime.deactivate_scene_runtime(f.scene_uuid).unwrap();
        step(&mut f.runtime);
        let after_deactivate = f
            .runtime
            .scene_runtime(f.scene_uuid)
            .unwrap()
            .current_time();
        assert!((after_deactivate - after_two).abs() < 1e-9);
    }

    #[test]
    fn unknown_scene_is_reported() {
        let mut f = fixture(None);
        assert!(matches!(
            f.runtime.add_scene_runtime(999),
            Err(RuntimeError::UnknownScene(999))
        ));
        assert!(matches!(
            f.runtime.set_scene_runtime_as_active(999),
            Err(RuntimeError::UnknownScene(999))
        ));
    }
}
