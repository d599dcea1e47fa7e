//! Graphics Submission
//!
//! Runs last in the frame order: reads the final transforms and cache
//! references of the active scene and rebuilds the draw list the
//! viewport renders from. Entities whose model failed to load are
//! skipped, which is the degraded-not-crashed path for broken assets.

#![allow(dead_code)]

use macroquad::math::{Mat4, Vec3};

use crate::defs::scene::CameraDefinition;
use crate::defs::Uuid;
use crate::math::{BoundingBox, Transform};
use crate::runtime::{AssetCaches, AssetRuntime, SceneRuntime};

use super::ComponentError;

/// The camera a scene renders with.
#[derive(Debug, Clone)]
pub struct CameraRuntime {
    pub transform: Transform,
    pub movement_speed: f32,
    pub fov_degrees: f32,
}

impl CameraRuntime {
    pub fn from_definition(definition: &CameraDefinition) -> Self {
        Self {
            transform: definition.transform.to_transform(),
            movement_speed: definition.movement_speed,
            fov_degrees: definition.fov_degrees,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.transform.position;
        Mat4::look_at_rh(eye, eye + self.transform.forward(), Vec3::Y)
    }
}

impl Default for CameraRuntime {
    fn default() -> Self {
        Self::from_definition(&CameraDefinition::default())
    }
}

/// One entity submitted for drawing
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub entity: Uuid,
    pub model: Uuid,
    pub matrix: Mat4,
    pub bounding_box: BoundingBox,
    pub color: [f32; 4],
}

/// Everything the viewport needs to draw one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
    pub clear_color: [f32; 4],
    pub view: Option<Mat4>,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub camera_fov_degrees: f32,
}

/// The graphics subsystem. Owns the draw list between frames so the
/// editor can keep drawing the last submitted frame while no scene is
/// active.
#[derive(Debug, Default)]
pub struct GraphicsComponent {
    draw_list: DrawList,
}

impl GraphicsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Reset to the empty default frame (no active scene)
    pub fn clear(&mut self) {
        self.draw_list = DrawList::default();
    }

    pub fn update(
        &mut self,
        scene: &mut SceneRuntime,
        caches: &mut AssetCaches,
    ) -> Result<(), ComponentError> {
        self.draw_list.calls.clear();
        self.draw_list.clear_color = scene.clear_color();
        let camera = scene.camera();
        self.draw_list.view = Some(camera.view_matrix());
        self.draw_list.camera_position = camera.transform.position;
        self.draw_list.camera_target = camera.transform.position + camera.transform.forward();
        self.draw_list.camera_fov_degrees = camera.fov_degrees;

        for entity in scene.entities() {
            let Some(model_uuid) = entity.model() else {
                continue;
            };
            let Some(model) = caches.models.get_by_uuid(model_uuid) else {
                continue;
            };
            if !model.shared().loaded() || model.shared().load_error() {
                continue;
            }
            let color = entity
                .material()
                .and_then(|uuid| caches.materials.get_by_uuid(uuid))
                .filter(|material| material.shared().loaded())
                .map(|material| material.color())
                .unwrap_or([1.0; 4]);
            self.draw_list.calls.push(DrawCall {
                entity: entity.uuid(),
                model: model_uuid,
                matrix: entity.transform.to_matrix(),
                bounding_box: model
                    .bounding_box()
                    .at(entity.transform.position, entity.transform.scale),
                color,
            });
        }
        Ok(())
    }
}
