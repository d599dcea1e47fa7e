//! Transform and bounds math shared by runtimes and the editor viewport.
//!
//! Transforms use euler angles in degrees and a uniform scale factor,
//! which is what the authoring panels edit directly. Matrices are only
//! built when a frame is submitted for drawing.

#![allow(dead_code)]

use macroquad::math::{EulerRot, Mat4, Quat, Vec3};

/// Local transform: position, euler rotation (degrees), uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    /// Identity transform (origin, no rotation, scale 1)
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    /// Create a transform at a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Build the 4x4 matrix for rendering
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation_quat(),
            self.position,
        )
    }

    /// Rotation as a quaternion (YXZ order, degrees to radians)
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// Forward direction (negative Z rotated by the current rotation)
    pub fn forward(&self) -> Vec3 {
        self.rotation_quat() * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Translate by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Unit cube centered at the origin
    pub const UNIT: BoundingBox = BoundingBox {
        min: Vec3::new(-0.5, -0.5, -0.5),
        max: Vec3::new(0.5, 0.5, 0.5),
    };

    /// Box from half extents, centered at the origin
    pub fn from_half_extents(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Box translated to a world position and scaled
    pub fn at(&self, position: Vec3, scale: f32) -> Self {
        Self {
            min: self.min * scale + position,
            max: self.max * scale + position,
        }
    }

    /// Overlap test against another box
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Per-axis penetration depth when overlapping (positive on overlap)
    pub fn penetration(&self, other: &BoundingBox) -> Vec3 {
        Vec3::new(
            (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0),
            (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0),
            (self.max.z.min(other.max.z) - self.min.z.max(other.min.z)).max(0.0),
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_matrix_carries_translation() {
        let t = Transform::from_position(Vec3::new(10.0, 20.0, 30.0));
        let m = t.to_matrix();
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(10.0, 20.0, 30.0)).length() < 0.001);
    }

    #[test]
    fn bounding_box_overlap() {
        let a = BoundingBox::from_half_extents(Vec3::splat(1.0));
        let b = a.at(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = a.at(Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn penetration_reports_smallest_axis() {
        let a = BoundingBox::from_half_extents(Vec3::splat(1.0));
        let b = a.at(Vec3::new(1.8, 0.0, 0.0), 1.0);
        let pen = a.penetration(&b);
        assert!((pen.x - 0.2).abs() < 0.001);
        assert!(pen.y > pen.x);
    }
}
