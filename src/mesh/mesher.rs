//! Chunked surface extraction
//!
//! Each chunk is meshed independently from a shared read-only grid: one quad
//! per solid-voxel face whose neighbor is empty or outside the grid. Faces
//! are never merged, so the union of all chunk meshes equals the mesh of the
//! whole grid treated as a single chunk.

use glam::{IVec3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::atlas::UvMapper;
use super::buffers::MeshBuffers;
use super::face::Face;
use crate::voxel::chunk::{ChunkCoord, ChunkLayout};
use crate::voxel::grid::{Occupancy, VoxelGrid3D};

/// Faces emitted by crossed-plane meshing, through the voxel center.
const CROSSED_PLANES: [Face; 3] = [Face::Left, Face::Back, Face::Top];

/// How solid voxels turn into quads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshStyle {
    /// One quad per exposed face
    #[default]
    Culled,
    /// Three single-sided planes through every voxel center, no culling.
    /// Suited to foliage.
    CrossedPlanes,
}

/// Extracts per-chunk meshes from a voxel grid.
pub struct ChunkMesher<'a, T, U> {
    grid: &'a VoxelGrid3D<T>,
    uv: &'a U,
    layout: ChunkLayout,
    offset: Vec3,
    style: MeshStyle,
}

impl<'a, T: Occupancy, U: UvMapper> ChunkMesher<'a, T, U> {
    pub fn new(grid: &'a VoxelGrid3D<T>, uv: &'a U, chunk_size: u32) -> Self {
        Self {
            grid,
            uv,
            layout: ChunkLayout::new(grid.dims(), chunk_size),
            offset: Vec3::ZERO,
            style: MeshStyle::Culled,
        }
    }

    /// Translate output positions so the grid is centered on the XZ origin.
    pub fn centered(self) -> Self {
        let dims = self.grid.dims();
        let offset = Vec3::new(-((dims.x / 2) as f32), 0.0, -((dims.z / 2) as f32));
        self.with_offset(offset)
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_style(mut self, style: MeshStyle) -> Self {
        self.style = style;
        self
    }

    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// Mesh one chunk. Returns `None` when the chunk produces no quads.
    pub fn extract_chunk(&self, coord: ChunkCoord) -> Option<MeshBuffers> {
        let (min, max) = self.layout.voxel_bounds(coord);
        let mesh = self.extract_region(min, max);
        (!mesh.is_empty()).then_some(mesh)
    }

    /// Mesh the voxels in `[min, max)`, clipped to the grid.
    ///
    /// Neighbor tests always read the full grid, so faces on region borders
    /// are culled against voxels in adjacent regions.
    pub fn extract_region(&self, min: IVec3, max: IVec3) -> MeshBuffers {
        let min = min.max(IVec3::ZERO);
        let max = max.min(self.grid.dims().as_ivec3());
        let mut mesh = MeshBuffers::new();

        for x in min.x..max.x {
            for z in min.z..max.z {
                for y in min.y..max.y {
                    if !self.grid.is_solid(x, y, z) {
                        continue;
                    }
                    let voxel = IVec3::new(x, y, z);
                    match self.style {
                        MeshStyle::Culled => self.push_exposed_faces(&mut mesh, voxel),
                        MeshStyle::CrossedPlanes => self.push_crossed_planes(&mut mesh, voxel),
                    }
                }
            }
        }

        mesh
    }

    /// The whole grid as a single region.
    pub fn extract_whole(&self) -> MeshBuffers {
        self.extract_region(IVec3::ZERO, self.grid.dims().as_ivec3())
    }

    /// Mesh every chunk in parallel, skipping empty ones.
    ///
    /// Results come back in [`ChunkLayout::coords`] order.
    pub fn extract_all(&self) -> Vec<(ChunkCoord, MeshBuffers)>
    where
        T: Sync,
        U: Sync,
    {
        self.layout
            .coords()
            .par_iter()
            .filter_map(|&coord| self.extract_chunk(coord).map(|mesh| (coord, mesh)))
            .collect()
    }

    fn push_exposed_faces(&self, mesh: &mut MeshBuffers, voxel: IVec3) {
        for face in Face::ALL {
            // Off-grid neighbors read as empty, so grid borders are exposed.
            if self.grid.get_at(voxel + face.offset()).is_solid() {
                continue;
            }
            self.push_face(mesh, face, face.corners(voxel.as_vec3()));
        }
    }

    fn push_crossed_planes(&self, mesh: &mut MeshBuffers, voxel: IVec3) {
        for face in CROSSED_PLANES {
            self.push_face(mesh, face, face.mid_plane_corners(voxel.as_vec3()));
        }
    }

    fn push_face(&self, mesh: &mut MeshBuffers, face: Face, corners: [Vec3; 4]) {
        let uvs = self.uv.face_uvs(face, corners[0].y);
        mesh.push_quad(corners.map(|c| c + self.offset), face.normal(), uvs);
    }
}
