//! Voxgen - procedural voxel terrain and tree generation with chunked meshing

pub mod core;
pub mod generation;
pub mod terrain;
pub mod voxel;
pub mod mesh;
