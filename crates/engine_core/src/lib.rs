//! Core engine types and utilities for SkyDodge.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Frame timing and delta sanitising
//! - Euler orientation and pose types

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
