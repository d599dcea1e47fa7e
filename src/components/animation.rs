//! Animation
//!
//! Applies keyframe-driven position offsets and path following to entity
//! transforms. Runs after physics so animated offsets sit on top of the
//! physically resolved position from this frame.

#![allow(dead_code)]

use macroquad::math::Vec3;

use crate::defs::asset::{AssetAttributes, KeyframeDef};
use crate::runtime::SceneRuntime;

use super::{ComponentError, Time};

/// One resolved keyframe
#[derive(Debug, Clone, Copy)]
pub struct Keyframe {
    pub time: f32,
    pub position: Vec3,
}

/// Entity-owned animation state, resolved from an Animation definition.
#[derive(Debug, Clone)]
pub struct AnimationState {
    keyframes: Vec<Keyframe>,
    duration: f32,
    elapsed: f32,
    looping: bool,
    pub playing: bool,
}

impl AnimationState {
    /// Build from Animation attributes. Returns None when the definition
    /// is another kind or has no usable keyframes; keyframes must be in
    /// ascending time order.
    pub fn from_attributes(attributes: &AssetAttributes) -> Option<Self> {
        let AssetAttributes::Animation { keyframes, looping } = attributes else {
            return None;
        };
        if keyframes.is_empty() {
            return None;
        }
        if keyframes.windows(2).any(|w| w[1].time < w[0].time) {
            log::warn!("animation: keyframes out of order, definition skipped");
            return None;
        }
        let frames: Vec<Keyframe> = keyframes
            .iter()
            .map(|k: &KeyframeDef| Keyframe {
                time: k.time.max(0.0),
                position: Vec3::from_array(k.position),
            })
            .collect();
        let duration = frames.last().map(|k| k.time).unwrap_or(0.0);
        Some(Self {
            keyframes: frames,
            duration,
            elapsed: 0.0,
            looping: *looping,
            playing: true,
        })
    }

    /// Advance and return the current position offset
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if self.playing && self.duration > 0.0 {
            self.elapsed += dt;
            if self.looping {
                self.elapsed %= self.duration;
            } else if self.elapsed >= self.duration {
                self.elapsed = self.duration;
                self.playing = false;
            }
        }
        self.sample(self.elapsed)
    }

    /// Interpolated offset at a point in time
    pub fn sample(&self, at: f32) -> Vec3 {
        let first = match self.keyframes.first() {
            Some(k) => k,
            None => return Vec3::ZERO,
        };
        if at <= first.time {
            return first.position;
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if at <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.position;
                }
                let t = (at - a.time) / span;
                return a.position.lerp(b.position, t);
            }
        }
        self.keyframes.last().map(|k| k.position).unwrap_or(Vec3::ZERO)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Entity-owned waypoint follower, resolved from a Path definition.
#[derive(Debug, Clone)]
pub struct PathFollower {
    waypoints: Vec<Vec3>,
    speed: f32,
    next: usize,
}

impl PathFollower {
    pub fn from_attributes(attributes: &AssetAttributes) -> Option<Self> {
        let AssetAttributes::Path { waypoints, speed } = attributes else {
            return None;
        };
        if waypoints.len() < 2 {
            return None;
        }
        Some(Self {
            waypoints: waypoints.iter().map(|w| Vec3::from_array(*w)).collect(),
            speed: speed.max(0.0),
            next: 0,
        })
    }

    /// Step toward the next waypoint, wrapping at the end of the loop
    pub fn advance(&mut self, current: Vec3, dt: f32) -> Vec3 {
        let target = self.waypoints[self.next];
        let to_target = target - current;
        let step = self.speed * dt;
        if to_target.length() <= step {
            self.next = (self.next + 1) % self.waypoints.len();
            return target;
        }
        current + to_target.normalize() * step
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }
}

/// The animation subsystem.
#[derive(Debug, Default)]
pub struct AnimationComponent;

impl AnimationComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, scene: &mut SceneRuntime, time: &Time) -> Result<(), ComponentError> {
        let dt = time.delta();
        for uuid in scene.entity_uuids() {
            let Some(entity) = scene.entity_mut(uuid) else {
                continue;
            };
            // Path following takes precedence over keyframe offsets when
            // an entity carries both.
            if let Some(follower) = entity.path_follower.as_mut() {
                entity.transform.position = follower.advance(entity.transform.position, dt);
                continue;
            }
            if let Some(animation) = entity.animation.as_mut() {
                let offset = animation.advance(dt);
                entity.transform.position = entity.base_position() + offset;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_frame_state(looping: bool) -> AnimationState {
        AnimationState::from_attributes(&AssetAttributes::Animation {
            keyframes: vec![
                KeyframeDef {
                    time: 0.0,
                    position: [0.0, 0.0, 0.0],
                },
                KeyframeDef {
                    time: 2.0,
                    position: [10.0, 0.0, 0.0],
                },
            ],
            looping,
        })
        .unwrap()
    }

    #[test]
    fn sample_interpolates_between_frames() {
        let state = two_frame_state(false);
        let mid = state.sample(1.0);
        assert!((mid.x - 5.0).abs() < 0.001);
    }

    #[test]
    fn non_looping_animation_clamps_and_stops() {
        let mut state = two_frame_state(false);
        state.advance(5.0);
        assert!(!state.playing);
        assert!((state.sample(state.elapsed()).x - 10.0).abs() < 0.001);
    }

    #[test]
    fn out_of_order_keyframes_are_rejected() {
        let attrs = AssetAttributes::Animation {
            keyframes: vec![
                KeyframeDef {
                    time: 2.0,
                    position: [0.0; 3],
                },
                KeyframeDef {
                    time: 1.0,
                    position: [0.0; 3],
                },
            ],
            looping: false,
        };
        assert!(AnimationState::from_attributes(&attrs).is_none());
    }

    #[test]
    fn path_follower_walks_waypoints() {
        let mut follower = PathFollower::from_attributes(&AssetAttributes::Path {
            waypoints: vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
            speed: 1.0,
        })
        .unwrap();
        // Approaches the first waypoint at its configured speed
        let pos = follower.advance(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!((pos.x - 2.0).abs() < 0.01);
        // Snaps onto the waypoint and advances to the next leg
        let pos = follower.advance(Vec3::new(0.5, 0.0, 0.0), 1.0);
        assert_eq!(pos, Vec3::ZERO);
        let pos = follower.advance(pos, 1.0);
        assert!((pos.x - 1.0).abs() < 0.01);
    }
}
