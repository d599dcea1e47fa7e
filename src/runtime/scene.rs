//! Scene Runtime
//!
//! A live instance of a scene definition with its own lifecycle state
//! machine. The scene owns its entity runtimes and its physics world;
//! the camera comes from the definition and belongs to the scene for
//! its whole life. Entities are constructed root-first so children can
//! resolve against an already-built parent, and destroyed in reverse so
//! no child outlives its parent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;

use macroquad::math::Vec3;

use crate::components::graphics::CameraRuntime;
use crate::components::physics::PhysicsWorld;
use crate::defs::{format_uuid, EntityDefinition, ProjectDefinition, SceneDefinition, Uuid};
use crate::storage::Storage;

use super::{AssetCaches, EntityRuntime, RuntimeError};

/// Scene lifecycle states. `Destroyed` is terminal; a destroyed scene
/// instance is removed from the project and never re-enters the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    ToLoad,
    Loaded,
    Active,
    ToDestroy,
    Destroyed,
}

impl SceneState {
    pub fn label(&self) -> &'static str {
        match self {
            SceneState::ToLoad => "ToLoad",
            SceneState::Loaded => "Loaded",
            SceneState::Active => "Active",
            SceneState::ToDestroy => "ToDestroy",
            SceneState::Destroyed => "Destroyed",
        }
    }

    /// Whether the lifecycle allows moving from this state to `next`.
    ///
    /// `Active -> Loaded` is the explicit deactivation step; activating
    /// another scene never demotes this one implicitly. `ToLoad ->
    /// ToDestroy` covers scenes destroyed before they ever materialized.
    pub fn can_transition_to(&self, next: SceneState) -> bool {
        matches!(
            (self, next),
            (SceneState::ToLoad, SceneState::Loaded)
                | (SceneState::ToLoad, SceneState::ToDestroy)
                | (SceneState::Loaded, SceneState::Active)
                | (SceneState::Active, SceneState::Loaded)
                | (SceneState::Loaded, SceneState::ToDestroy)
                | (SceneState::Active, SceneState::ToDestroy)
                | (SceneState::ToDestroy, SceneState::Destroyed)
        )
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub struct SceneRuntime {
    uuid: Uuid,
    name: String,
    state: SceneState,

    /// Entities keyed by uuid; `entity_order` preserves construction
    /// order (parents before children)
    entities: HashMap<Uuid, EntityRuntime>,
    entity_order: Vec<Uuid>,

    camera: CameraRuntime,
    physics_world: Option<PhysicsWorld>,
    clear_color: [f32; 4],

    /// Seconds this scene has spent active
    scene_time: f64,
}

impl SceneRuntime {
    /// Create a scene in `ToLoad`; entities materialize on the owning
    /// project's next update pass.
    pub fn new(definition: &SceneDefinition) -> Self {
        log::trace!("scene {}: constructing", definition.name);
        Self {
            uuid: definition.uuid,
            name: definition.name.clone(),
            state: SceneState::ToLoad,
            entities: HashMap::new(),
            entity_order: Vec::new(),
            camera: CameraRuntime::default(),
            physics_world: None,
            clear_color: [0.0; 4],
            scene_time: 0.0,
        }
    }

    /// Materialize the scene: physics world, camera, then the whole
    /// entity tree root-first. Entities with broken asset references are
    /// still constructed (with recorded errors) and the scene reaches
    /// `Loaded` regardless.
    pub fn load_from_definition(
        &mut self,
        scene_def: &SceneDefinition,
        project: &ProjectDefinition,
        caches: &mut AssetCaches,
        storage: &Storage,
    ) -> Result<(), RuntimeError> {
        if self.state != SceneState::ToLoad {
            return Err(RuntimeError::InvalidTransition {
                from: self.state,
                to: SceneState::Loaded,
            });
        }
        self.physics_world = Some(PhysicsWorld::new(Vec3::from_array(scene_def.gravity)));
        self.camera = CameraRuntime::from_definition(&scene_def.camera);
        self.clear_color = scene_def.clear_color;

        self.instantiate(&scene_def.root, None, Vec3::ZERO, project, caches, storage);

        let errors: usize = self
            .entities
            .values()
            .map(|e| e.load_errors().len())
            .sum();
        self.state = SceneState::Loaded;
        log::info!(
            "scene {}: loaded {} entities ({} reference error(s))",
            self.name,
            self.entity_order.len(),
            errors
        );
        Ok(())
    }

    fn instantiate(
        &mut self,
        definition: &EntityDefinition,
        parent: Option<Uuid>,
        parent_position: Vec3,
        project: &ProjectDefinition,
        caches: &mut AssetCaches,
        storage: &Storage,
    ) {
        let entity =
            EntityRuntime::from_definition(definition, parent, parent_position, project, caches, storage);
        let position = entity.transform.position;
        let uuid = entity.uuid();

        if self.entities.contains_key(&uuid) {
            log::warn!(
                "scene {}: duplicate entity uuid {}, skipped",
                self.name,
                format_uuid(uuid)
            );
            return;
        }
        if let Some(parent_uuid) = parent {
            if let Some(parent_entity) = self.entities.get_mut(&parent_uuid) {
                parent_entity.push_child(uuid);
            }
        }
        self.entity_order.push(uuid);
        self.entities.insert(uuid, entity);

        for child in &definition.children {
            self.instantiate(child, Some(uuid), position, project, caches, storage);
        }
    }

    /// Request or apply a lifecycle transition. Same-state requests are
    /// accepted as no-ops; anything the lifecycle forbids is refused.
    pub fn set_state(&mut self, next: SceneState) -> Result<(), RuntimeError> {
        if self.state == next {
            return Ok(());
        }
        if !self.state.can_transition_to(next) {
            return Err(RuntimeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        log::debug!("scene {}: {} -> {}", self.name, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Tear the scene down: entities are destroyed children-first
    /// (reverse construction order) and the physics world is released.
    /// Returns the destruction order for the caller's records.
    pub(crate) fn destroy(&mut self) -> Vec<Uuid> {
        let mut destroyed = Vec::with_capacity(self.entity_order.len());
        for uuid in self.entity_order.iter().rev() {
            if let Some(entity) = self.entities.remove(uuid) {
                log::trace!("scene {}: destroying entity {}", self.name, entity.name());
                destroyed.push(*uuid);
            }
        }
        self.entity_order.clear();
        self.physics_world = None;
        self.state = SceneState::Destroyed;
        destroyed
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn has_state(&self, state: SceneState) -> bool {
        self.state == state
    }

    /// Entities in construction order (parents before children)
    pub fn entities(&self) -> impl Iterator<Item = &EntityRuntime> {
        self.entity_order
            .iter()
            .filter_map(|uuid| self.entities.get(uuid))
    }

    /// Uuids in construction order
    pub fn entity_uuids(&self) -> Vec<Uuid> {
        self.entity_order.clone()
    }

    pub fn entity(&self, uuid: Uuid) -> Option<&EntityRuntime> {
        self.entities.get(&uuid)
    }

    pub fn entity_mut(&mut self, uuid: Uuid) -> Option<&mut EntityRuntime> {
        self.entities.get_mut(&uuid)
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&EntityRuntime> {
        self.entities().find(|e| e.name() == name)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The root entity, when the scene is materialized
    pub fn root_entity(&self) -> Option<&EntityRuntime> {
        self.entity_order
            .first()
            .and_then(|uuid| self.entities.get(uuid))
    }

    pub fn camera(&self) -> &CameraRuntime {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRuntime {
        &mut self.camera
    }

    pub fn physics_world(&self) -> Option<&PhysicsWorld> {
        self.physics_world.as_ref()
    }

    pub fn physics_world_mut(&mut self) -> Option<&mut PhysicsWorld> {
        self.physics_world.as_mut()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Seconds this scene has been active
    pub fn current_time(&self) -> f64 {
        self.scene_time
    }

    pub(crate) fn advance_time(&mut self, delta: f64) {
        self.scene_time += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_matches_lifecycle() {
        use SceneState::*;
        assert!(ToLoad.can_transition_to(Loaded));
        assert!(Loaded.can_transition_to(Active));
        assert!(Active.can_transition_to(Loaded));
        assert!(Active.can_transition_to(ToDestroy));
        assert!(ToDestroy.can_transition_to(Destroyed));

        // No regressions or resurrection
        assert!(!Loaded.can_transition_to(ToLoad));
        assert!(!Destroyed.can_transition_to(Loaded));
        assert!(!Destroyed.can_transition_to(Active));
        assert!(!ToDestroy.can_transition_to(Active));
    }

    #[test]
    fn set_state_refuses_forbidden_transition() {
        let def = SceneDefinition::new("s");
        let mut scene = SceneRuntime::new(&def);
        let err = scene.set_state(SceneState::Active).unwrap_err();
        match err {
            RuntimeError::InvalidTransition { from, to } => {
                assert_eq!(from, SceneState::ToLoad);
                assert_eq!(to, SceneState::Active);
            }
            other => panic!("unexpected error {:?}", other),
        }
        // State unchanged after the refused request
        assert_eq!(scene.state(), SceneState::ToLoad);
    }

    #[test]
    fn same_state_request_is_a_no_op() {
        let def = SceneDefinition::new("s");
        let mut scene = SceneRuntime::new(&def);
        assert!(scene.set_state(SceneState::ToLoad).is_ok());
    }
}
