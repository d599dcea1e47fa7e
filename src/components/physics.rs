//! Physics
//!
//! Box-body physics for scene entities: gravity integration, AABB
//! overlap resolution against static bodies, and collision events for
//! everything that touched. Each scene owns one `PhysicsWorld`, built
//! when the scene loads and released when it is destroyed. Scripting
//! runs before this step, so script-driven teleports and impulses are
//! seen by the same frame's physics.

#![allow(dead_code)]

use macroquad::math::Vec3;

use crate::defs::asset::{AssetAttributes, PhysicsShape};
use crate::defs::Uuid;
use crate::math::BoundingBox;
use crate::runtime::SceneRuntime;

use super::event::{CollisionEvent, EventQueue};
use super::{ComponentError, Time};

/// Falling speed cap, matching what the solver can resolve in one step
const TERMINAL_VELOCITY: f32 = 50.0;

/// Per-entity physics state, resolved from a Physics asset definition.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub shape: PhysicsShape,
    pub mass: f32,
    pub is_static: bool,
    pub half_extents: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl PhysicsBody {
    /// Build from Physics attributes; returns None for other kinds
    pub fn from_attributes(attributes: &AssetAttributes) -> Option<Self> {
        let AssetAttributes::Physics {
            shape,
            mass,
            is_static,
            half_extents,
        } = attributes
        else {
            return None;
        };
        Some(Self {
            shape: *shape,
            mass: *mass,
            is_static: *is_static,
            half_extents: Vec3::from_array(*half_extents),
            velocity: Vec3::ZERO,
            grounded: false,
        })
    }

    /// World-space box at a position
    pub fn aabb_at(&self, position: Vec3) -> BoundingBox {
        BoundingBox {
            min: position - self.half_extents,
            max: position + self.half_extents,
        }
    }
}

/// Per-scene physics state. Owned by the scene runtime for its lifetime.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    pub gravity: Vec3,
    /// Collisions raised by the most recent step
    pub collisions: EventQueue<CollisionEvent>,
    /// Steps run since the world was created
    pub steps: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            collisions: EventQueue::new(),
            steps: 0,
        }
    }
}

/// The physics subsystem. Stateless between frames; all mutable state
/// lives on the scene's world and the entities' bodies.
#[derive(Debug, Default)]
pub struct PhysicsComponent;

impl PhysicsComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, scene: &mut SceneRuntime, time: &Time) -> Result<(), ComponentError> {
        let dt = time.delta();
        let gravity = match scene.physics_world() {
            Some(world) => world.gravity,
            None => {
                return Err(ComponentError::new(
                    "physics world not constructed for scene",
                ))
            }
        };

        // Snapshot colliders at pre-step positions
        let colliders: Vec<(Uuid, bool, BoundingBox)> = scene
            .entities()
            .filter_map(|entity| {
                let body = entity.physics_body.as_ref()?;
                Some((
                    entity.uuid(),
                    body.is_static,
                    body.aabb_at(entity.transform.position),
                ))
            })
            .collect();

        let mut events: Vec<CollisionEvent> = Vec::new();

        for uuid in scene.entity_uuids() {
            let Some(entity) = scene.entity_mut(uuid) else {
                continue;
            };
            let Some(body) = entity.physics_body.as_mut() else {
                continue;
            };
            if body.is_static {
                continue;
            }

            body.velocity += gravity * dt;
            if body.velocity.length() > TERMINAL_VELOCITY {
                body.velocity = body.velocity.normalize() * TERMINAL_VELOCITY;
            }
            let mut position = entity.transform.position + body.velocity * dt;
            if !position.is_finite() {
                return Err(ComponentError::new(format!(
                    "non-finite position for entity {}",
                    crate::defs::format_uuid(uuid)
                )));
            }

            body.grounded = false;
            let mut velocity = body.velocity;
            let half = body.half_extents;

            for (other_uuid, is_static, other_box) in &colliders {
                if *other_uuid == uuid {
                    continue;
                }
                let own_box = BoundingBox {
                    min: position - half,
                    max: position + half,
                };
                if !own_box.intersects(other_box) {
                    continue;
                }
                let pen = own_box.penetration(other_box);
                events.push(CollisionEvent {
                    entity: uuid,
                    other: *other_uuid,
                    penetration: pen,
                });
                if !is_static {
                    // Dynamic pairs only report; resolution is against statics
                    continue;
                }
                // Push out along the axis of least penetration
                if pen.y <= pen.x && pen.y <= pen.z {
                    if own_box.center().y >= other_box.center().y {
                        position.y += pen.y;
                        body.grounded = true;
                    } else {
                        position.y -= pen.y;
                    }
                    velocity.y = 0.0;
                } else if pen.x <= pen.z {
                    if own_box.center().x >= other_box.center().x {
                        position.x += pen.x;
                    } else {
                        position.x -= pen.x;
                    }
                    velocity.x = 0.0;
                } else {
                    if own_box.center().z >= other_box.center().z {
                        position.z += pen.z;
                    } else {
                        position.z -= pen.z;
                    }
                    velocity.z = 0.0;
                }
            }

            body.velocity = velocity;
            entity.transform.position = position;
        }

        if let Some(world) = scene.physics_world_mut() {
            world.collisions.clear();
            for event in events {
                world.collisions.send(event);
            }
            world.steps += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_from_non_physics_attributes_is_none() {
        let attrs = AssetAttributes::Texture {
            path: "t.png".to_string(),
        };
        assert!(PhysicsBody::from_attributes(&attrs).is_none());
    }

    #[test]
    fn aabb_is_centered_on_position() {
        let attrs = AssetAttributes::Physics {
            shape: PhysicsShape::Box,
            mass: 1.0,
            is_static: false,
            half_extents: [1.0, 1.0, 1.0],
        };
        let body = PhysicsBody::from_attributes(&attrs).unwrap();
        let aabb = body.aabb_at(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(aabb.center(), Vec3::new(5.0, 0.0, 0.0));
    }
}
