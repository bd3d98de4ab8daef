//! Voxel data structures and chunking

pub mod grid;
pub mod chunk;
pub mod procgen;

pub use grid::{Occupancy, TreeVoxel, VoxelGrid3D};
pub use chunk::{ChunkCoord, ChunkLayout, DEFAULT_CHUNK_SIZE};
pub use procgen::{TreeGenerator, TreeVolume};
