//! Floating obstacles and the slot-stable pool that holds them.
//!
//! Obstacles are never freed during a run. Once they fall behind the vehicle
//! they are moved back out ahead (recycled) in place, so an [`ObstacleId`]
//! names the same slot for the whole session.

use std::time::Duration;

use engine_core::{Orientation, Quat, Vec3};
use physics::{Aabb, BoundingShape, Collider};
use rand::Rng;

/// Rotation rate scale per axis, applied per reference frame.
const SPIN_AXES: Vec3 = Vec3::new(1.5, 0.8, 0.6);
/// Frames per second the per-frame spin rates were tuned at.
const REFERENCE_FPS: f32 = 60.0;
/// Height of the idle bob drawn by the renderer.
const BOB_AMPLITUDE: f32 = 0.5;

/// Slot index into an [`ObstaclePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u32);

impl ObstacleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Obstacle archetype. Picked uniformly for every new obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Box,
    Sphere,
    Cylinder,
    Ring,
    Pyramid,
    Diamond,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::Box,
        ObstacleKind::Sphere,
        ObstacleKind::Cylinder,
        ObstacleKind::Ring,
        ObstacleKind::Pyramid,
        ObstacleKind::Diamond,
    ];

    /// Stable numeric id handed to the renderer.
    pub fn id(self) -> u8 {
        match self {
            ObstacleKind::Box => 0,
            ObstacleKind::Sphere => 1,
            ObstacleKind::Cylinder => 2,
            ObstacleKind::Ring => 3,
            ObstacleKind::Pyramid => 4,
            ObstacleKind::Diamond => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Box => "box",
            ObstacleKind::Sphere => "sphere",
            ObstacleKind::Cylinder => "cylinder",
            ObstacleKind::Ring => "ring",
            ObstacleKind::Pyramid => "pyramid",
            ObstacleKind::Diamond => "diamond",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Concrete dimensions of one obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleShape {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Ring { radius: f32, tube: f32 },
    Pyramid { radius: f32, height: f32 },
    Diamond { radius: f32 },
}

impl ObstacleShape {
    /// Roll random dimensions for an archetype.
    pub fn random<R: Rng + ?Sized>(kind: ObstacleKind, rng: &mut R) -> Self {
        match kind {
            ObstacleKind::Box => ObstacleShape::Box {
                size: Vec3::new(
                    rng.gen_range(2.0..6.0),
                    rng.gen_range(2.0..6.0),
                    rng.gen_range(2.0..6.0),
                ),
            },
            ObstacleKind::Sphere => ObstacleShape::Sphere {
                radius: rng.gen_range(1.5..4.5),
            },
            ObstacleKind::Cylinder => ObstacleShape::Cylinder {
                radius_top: rng.gen_range(1.0..3.0),
                radius_bottom: rng.gen_range(1.0..3.0),
                height: rng.gen_range(3.0..9.0),
            },
            ObstacleKind::Ring => ObstacleShape::Ring {
                radius: rng.gen_range(2.0..5.0),
                tube: rng.gen_range(0.5..1.5),
            },
            ObstacleKind::Pyramid => ObstacleShape::Pyramid {
                radius: rng.gen_range(1.5..4.5),
                height: rng.gen_range(3.0..7.0),
            },
            ObstacleKind::Diamond => ObstacleShape::Diamond {
                radius: rng.gen_range(1.5..4.0),
            },
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        match self {
            ObstacleShape::Box { .. } => ObstacleKind::Box,
            ObstacleShape::Sphere { .. } => ObstacleKind::Sphere,
            ObstacleShape::Cylinder { .. } => ObstacleKind::Cylinder,
            ObstacleShape::Ring { .. } => ObstacleKind::Ring,
            ObstacleShape::Pyramid { .. } => ObstacleKind::Pyramid,
            ObstacleShape::Diamond { .. } => ObstacleKind::Diamond,
        }
    }

    /// Collision volume. Tapered cylinders use their wider radius.
    pub fn bounding_shape(&self) -> BoundingShape {
        match *self {
            ObstacleShape::Box { size } => BoundingShape::Cuboid {
                half_extents: size * 0.5,
            },
            ObstacleShape::Sphere { radius } => BoundingShape::Ball { radius },
            ObstacleShape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => BoundingShape::Cylinder {
                half_height: height * 0.5,
                radius: radius_top.max(radius_bottom),
            },
            ObstacleShape::Ring { radius, tube } => BoundingShape::Torus {
                major_radius: radius,
                minor_radius: tube,
            },
            ObstacleShape::Pyramid { radius, height } => BoundingShape::Cone {
                half_height: height * 0.5,
                radius,
            },
            ObstacleShape::Diamond { radius } => BoundingShape::Octahedron { radius },
        }
    }
}

/// A floating obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
    /// Euler angles (x, y, z) in radians.
    pub rotation: Vec3,
    shape: ObstacleShape,
    /// Parry geometry for `shape`, built once at creation.
    collider: Collider,
    /// Idle bob frequency (radians per millisecond). Cosmetic only.
    pub float_speed: f32,
    pub float_phase: f32,
    /// Spin per reference frame.
    pub spin_rate: f32,
    /// Set once this pass has been counted; cleared on every recycle.
    pub scored: bool,
}

impl Obstacle {
    /// New obstacle of the given archetype with random dimensions and idle animation.
    pub fn new<R: Rng + ?Sized>(id: ObstacleId, kind: ObstacleKind, rng: &mut R) -> Self {
        let (float_speed, spin_rate) = match kind {
            ObstacleKind::Box => (rng.gen_range(0.010..0.030), rng.gen_range(0.005..0.015)),
            ObstacleKind::Sphere => (rng.gen_range(0.015..0.040), rng.gen_range(0.010..0.030)),
            ObstacleKind::Cylinder => (rng.gen_range(0.008..0.023), rng.gen_range(0.007..0.022)),
            ObstacleKind::Ring => (rng.gen_range(0.012..0.032), rng.gen_range(0.008..0.026)),
            ObstacleKind::Pyramid => (rng.gen_range(0.012..0.032), rng.gen_range(0.008..0.023)),
            ObstacleKind::Diamond => (rng.gen_range(0.015..0.040), rng.gen_range(0.010..0.030)),
        };
        let shape = ObstacleShape::random(kind, rng);
        Self {
            id,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            shape,
            collider: Collider::new(shape.bounding_shape()),
            float_speed,
            float_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            spin_rate,
            scored: false,
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        self.shape.kind()
    }

    /// Dimensions rolled at creation. Fixed for the obstacle's lifetime.
    pub fn shape(&self) -> ObstacleShape {
        self.shape
    }

    pub fn rotation_quat(&self) -> Quat {
        Orientation::new(self.rotation.x, self.rotation.y, self.rotation.z).to_quat()
    }

    /// World-space collision box.
    pub fn aabb(&self) -> Aabb {
        self.collider
            .world_aabb(self.position, self.rotation_quat())
    }

    /// Move toward the vehicle (+Z) and spin.
    pub fn advance(&mut self, distance: f32, dt: f32) {
        self.position.z += distance;
        let frames = dt * REFERENCE_FPS;
        self.rotation = wrap_angles(self.rotation + SPIN_AXES * self.spin_rate * frames);
    }

    /// Vertical bob offset for drawing at `elapsed` run time. Not applied to `position`.
    pub fn bob_offset(&self, elapsed: Duration) -> f32 {
        let ms = elapsed.as_secs_f32() * 1000.0;
        (ms * self.float_speed + self.float_phase).sin() * BOB_AMPLITUDE
    }
}

fn wrap_angles(v: Vec3) -> Vec3 {
    let tau = std::f32::consts::TAU;
    Vec3::new(v.x.rem_euclid(tau), v.y.rem_euclid(tau), v.z.rem_euclid(tau))
}

/// Fixed-ceiling arena of obstacles, indexed by slot.
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    capacity: usize,
    /// Whether saturation has been logged this run.
    saturation_logged: bool,
}

impl ObstaclePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            saturation_logged: false,
        }
    }

    /// Add an obstacle built for the next free slot. Returns `None` when full.
    pub fn insert_with<F>(&mut self, build: F) -> Option<ObstacleId>
    where
        F: FnOnce(ObstacleId) -> Obstacle,
    {
        if self.is_full() {
            self.note_full();
            return None;
        }
        let id = ObstacleId(self.slots.len() as u32);
        let mut obstacle = build(id);
        obstacle.id = id;
        self.slots.push(obstacle);
        Some(id)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.slots.get_mut(id.index())
    }

    /// Obstacles in slot (insertion) order.
    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.slots.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Log (once per run) that a spawn was dropped because every slot is taken.
    pub fn note_full(&mut self) {
        if !self.saturation_logged {
            log::info!("Obstacle pool full ({} slots), skipping new spawns", self.capacity);
            self.saturation_logged = true;
        }
    }

    /// Allow the saturation message to be logged again (new run).
    pub fn rearm_saturation_log(&mut self) {
        self.saturation_logged = false;
    }
}
