//! Surface extraction from voxel grids

pub mod face;
pub mod buffers;
pub mod atlas;
pub mod mesher;

pub use face::Face;
pub use buffers::MeshBuffers;
pub use atlas::{TerrainAtlas, TreeAtlas, UvMapper};
pub use mesher::{ChunkMesher, MeshStyle};
