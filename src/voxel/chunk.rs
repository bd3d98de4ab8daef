//! Chunk partitioning of a voxel grid into fixed-size cubic regions

use glam::{IVec3, UVec3};

/// Default edge length of a chunk, in voxels
pub const DEFAULT_CHUNK_SIZE: u32 = 16;

/// Integer coordinate identifying a chunk within a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing the given voxel
    pub fn from_voxel(pos: IVec3, chunk_size: u32) -> Self {
        let cs = chunk_size as i32;
        Self {
            x: pos.x.div_euclid(cs),
            y: pos.y.div_euclid(cs),
            z: pos.z.div_euclid(cs),
        }
    }

    /// Minimum voxel corner of this chunk
    pub fn voxel_origin(&self, chunk_size: u32) -> IVec3 {
        IVec3::new(self.x, self.y, self.z) * chunk_size as i32
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

/// How a grid of `dims` voxels splits into chunks of `chunk_size`.
///
/// Partial chunks at the far edges are kept, so every voxel belongs to
/// exactly one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    pub dims: UVec3,
    pub chunk_size: u32,
}

impl ChunkLayout {
    pub fn new(dims: UVec3, chunk_size: u32) -> Self {
        Self { dims, chunk_size: chunk_size.max(1) }
    }

    /// Number of chunks along each axis
    pub fn chunk_counts(&self) -> UVec3 {
        UVec3::new(
            self.dims.x.div_ceil(self.chunk_size),
            self.dims.y.div_ceil(self.chunk_size),
            self.dims.z.div_ceil(self.chunk_size),
        )
    }

    pub fn chunk_count(&self) -> usize {
        let c = self.chunk_counts();
        c.x as usize * c.y as usize * c.z as usize
    }

    /// All chunk coordinates, x outermost, then z, then y.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let c = self.chunk_counts();
        let mut coords = Vec::with_capacity(self.chunk_count());
        for cx in 0..c.x as i32 {
            for cz in 0..c.z as i32 {
                for cy in 0..c.y as i32 {
                    coords.push(ChunkCoord::new(cx, cy, cz));
                }
            }
        }
        coords
    }

    /// Voxel range `[min, max)` covered by a chunk, clipped to the grid.
    pub fn voxel_bounds(&self, coord: ChunkCoord) -> (IVec3, IVec3) {
        let min = coord.voxel_origin(self.chunk_size);
        let max = (min + IVec3::splat(self.chunk_size as i32)).min(self.dims.as_ivec3());
        (min.max(IVec3::ZERO), max)
    }
}
