//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3,
    IVec2, IVec3, UVec3,
};

/// Standard Result type for the generator
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
