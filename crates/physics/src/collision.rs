//! Axis-aligned bounding volumes and the overlap test.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::parry::shape::{Shape, SharedShape};

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Overlap test. Touching faces count as overlapping.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Collision volume of a body before it is placed in the world.
///
/// Cylinders and cones stand along local Y; the torus lies in the local XY
/// plane (its axis is local Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cylinder { half_height: f32, radius: f32 },
    Cone { half_height: f32, radius: f32 },
    Torus { major_radius: f32, minor_radius: f32 },
    Octahedron { radius: f32 },
}

/// A [`BoundingShape`] with its parry geometry built once.
///
/// Building the shape allocates (and hulls the octahedron), so bodies keep one
/// of these for their lifetime and only place it each tick.
#[derive(Clone)]
pub struct Collider {
    source: BoundingShape,
    shape: SharedShape,
    /// Rotation from the parry frame into the shape's frame.
    local: Quat,
}

impl Collider {
    pub fn new(source: BoundingShape) -> Self {
        let (shape, local) = match source {
            BoundingShape::Cuboid { half_extents } => (
                SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
                Quat::IDENTITY,
            ),
            BoundingShape::Ball { radius } => (SharedShape::ball(radius), Quat::IDENTITY),
            BoundingShape::Cylinder { half_height, radius } => {
                (SharedShape::cylinder(half_height, radius), Quat::IDENTITY)
            }
            BoundingShape::Cone { half_height, radius } => {
                (SharedShape::cone(half_height, radius), Quat::IDENTITY)
            }
            // Parry has no torus; a flat cylinder spanning the ring has the same box.
            BoundingShape::Torus {
                major_radius,
                minor_radius,
            } => (
                SharedShape::cylinder(minor_radius, major_radius + minor_radius),
                Quat::from_rotation_x(FRAC_PI_2),
            ),
            BoundingShape::Octahedron { radius } => {
                let points = [
                    Point3::new(radius, 0.0, 0.0),
                    Point3::new(-radius, 0.0, 0.0),
                    Point3::new(0.0, radius, 0.0),
                    Point3::new(0.0, -radius, 0.0),
                    Point3::new(0.0, 0.0, radius),
                    Point3::new(0.0, 0.0, -radius),
                ];
                let shape = SharedShape::convex_hull(&points).unwrap_or_else(|| {
                    log::warn!("Octahedron hull failed (r = {radius}), using a ball");
                    SharedShape::ball(radius)
                });
                (shape, Quat::IDENTITY)
            }
        };
        Self {
            source,
            shape,
            local,
        }
    }

    /// World-space AABB of this collider placed at `position` with `rotation`.
    pub fn world_aabb(&self, position: Vec3, rotation: Quat) -> Aabb {
        let aabb = self
            .shape
            .compute_aabb(&isometry(position, rotation * self.local));
        Aabb::new(
            Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
            Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
        )
    }
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider").field("source", &self.source).finish()
    }
}

/// Colliders are equal when built from the same dimensions.
impl PartialEq for Collider {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry3<f32> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ));
    Isometry3::from_parts(Translation3::new(position.x, position.y, position.z), rotation)
}

/// Index of the first volume (in iteration order) that overlaps `probe`.
pub fn first_overlap<I>(probe: &Aabb, volumes: I) -> Option<usize>
where
    I: IntoIterator<Item = Aabb>,
{
    volumes.into_iter().position(|v| probe.intersects(&v))
}
