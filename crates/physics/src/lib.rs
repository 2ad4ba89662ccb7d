//! Bounding-volume collision for SkyDodge.
//!
//! Shapes are built with Rapier's bundled parry geometry so rotated volumes
//! get a tight world-space AABB; the overlap test itself is plain AABB.

pub mod collision;

pub use collision::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
