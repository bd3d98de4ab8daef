//! World generation pipeline: heightmap, terrain voxels, trees, and meshes.
//!
//! The pipeline orchestrates:
//! 1. Heightmap construction (ground noise plus a fissure through the center)
//! 2. Terrain voxel population from the heightmap
//! 3. Chunked meshing of the terrain grid
//! 4. Tree growth and chunked meshing of its wood and leaf grids
//!
//! Meshes are handed to a [`ChunkSink`] one chunk at a time. Empty chunks are
//! never delivered.

pub mod config;
pub mod noise;

pub use config::{GenerationConfig, TreeConfig};
pub use self::noise::NoiseSampler;

use std::time::Instant;

use crate::core::Result;
use crate::mesh::{ChunkMesher, MeshBuffers, MeshStyle, TerrainAtlas, TreeAtlas, UvMapper};
use crate::terrain::generator::TerrainGenerator;
use crate::terrain::heightmap::{HeightmapGenerator, ScalarField2D};
use crate::voxel::chunk::ChunkCoord;
use crate::voxel::grid::{Occupancy, VoxelGrid3D};
use crate::voxel::procgen::tree::{TreeGenerator, TreeVolume};

/// Which grid a delivered mesh was extracted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshLayer {
    Terrain,
    Wood,
    Leaves,
}

/// Receives finished chunk meshes. Ownership of the buffers moves to the sink.
pub trait ChunkSink {
    fn on_chunk_ready(&mut self, layer: MeshLayer, coord: ChunkCoord, mesh: MeshBuffers);
}

impl<F> ChunkSink for F
where
    F: FnMut(MeshLayer, ChunkCoord, MeshBuffers),
{
    fn on_chunk_ready(&mut self, layer: MeshLayer, coord: ChunkCoord, mesh: MeshBuffers) {
        self(layer, coord, mesh)
    }
}

/// Counters from one meshing run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Chunks in the layout, empty or not
    pub chunks_visited: usize,
    /// Chunks delivered to the sink
    pub chunks_emitted: usize,
    pub quads_emitted: usize,
    pub solid_voxels: usize,
}

impl GenerationStats {
    pub fn merge(&mut self, other: GenerationStats) {
        self.chunks_visited += other.chunks_visited;
        self.chunks_emitted += other.chunks_emitted;
        self.quads_emitted += other.quads_emitted;
        self.solid_voxels += other.solid_voxels;
    }
}

/// Heightmap and voxel grid of one terrain run.
#[derive(Clone, Debug)]
pub struct TerrainVolume {
    pub field: ScalarField2D,
    pub grid: VoxelGrid3D<bool>,
}

/// Generation pipeline built from a validated [`GenerationConfig`].
pub struct GenerationPipeline {
    config: GenerationConfig,
    heightmap: HeightmapGenerator,
    terrain: TerrainGenerator,
    trees: TreeGenerator,
}

impl GenerationPipeline {
    /// Validate `config` and set up the generators.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let terrain = TerrainGenerator::new(config.terrain_params());
        let trees = TreeGenerator::new(config.tree.noise_offset);

        log::info!(
            "Generation pipeline: seed {}, map {}x{}x{}, chunk size {}",
            config.seed, config.map_width, config.map_height, config.map_length, config.chunk_size
        );

        Ok(Self {
            config,
            heightmap: HeightmapGenerator::default(),
            terrain,
            trees,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Build the heightmap and populate the terrain grid.
    pub fn generate_terrain(&self) -> TerrainVolume {
        let c = &self.config;
        let field = self.heightmap.generate(c.seed, c.map_width, c.map_length);
        let grid = self.terrain.populate(&field);
        TerrainVolume { field, grid }
    }

    /// Mesh a terrain grid chunk by chunk into `sink`.
    pub fn mesh_terrain<S: ChunkSink + ?Sized>(&self, volume: &TerrainVolume, sink: &mut S) -> GenerationStats {
        let atlas = TerrainAtlas::new(volume.grid.height());
        let mesher = ChunkMesher::new(&volume.grid, &atlas, self.config.chunk_size).centered();
        deliver(&mesher, MeshLayer::Terrain, volume.grid.solid_count(), sink)
    }

    /// Generate and mesh the terrain in one call.
    pub fn run_terrain<S: ChunkSink + ?Sized>(&self, sink: &mut S) -> GenerationStats {
        let start = Instant::now();
        let volume = self.generate_terrain();
        let stats = self.mesh_terrain(&volume, sink);

        log::info!(
            "Terrain done: {}/{} chunks emitted, {} quads in {:.1}ms",
            stats.chunks_emitted, stats.chunks_visited, stats.quads_emitted,
            start.elapsed().as_secs_f64() * 1000.0
        );
        stats
    }

    /// Grow the tree standing at world position `(x, z)`.
    pub fn generate_tree(&self, x: f32, z: f32) -> TreeVolume {
        self.trees.generate(x, z)
    }

    /// Mesh a tree's wood and leaf grids into `sink`, wood first.
    pub fn mesh_tree<S: ChunkSink + ?Sized>(&self, tree: &TreeVolume, sink: &mut S) -> GenerationStats {
        let chunk_size = self.config.tree.chunk_size;

        let wood = ChunkMesher::new(&tree.wood, &TreeAtlas, chunk_size).centered();
        let mut stats = deliver(&wood, MeshLayer::Wood, tree.wood.solid_count(), sink);

        let leaves = ChunkMesher::new(&tree.leaves, &TreeAtlas, chunk_size)
            .centered()
            .with_style(self.config.tree.leaf_mesh);
        stats.merge(deliver(&leaves, MeshLayer::Leaves, tree.leaves.solid_count(), sink));

        log::debug!(
            "Tree {:?}: {} chunks emitted, {} quads",
            tree.shape, stats.chunks_emitted, stats.quads_emitted
        );
        stats
    }

    /// Leaf style in effect for [`mesh_tree`](Self::mesh_tree)
    pub fn leaf_mesh(&self) -> MeshStyle {
        self.config.tree.leaf_mesh
    }
}

fn deliver<T, U, S>(mesher: &ChunkMesher<'_, T, U>, layer: MeshLayer, solid_voxels: usize, sink: &mut S) -> GenerationStats
where
    T: Occupancy,
    U: UvMapper,
    S: ChunkSink + ?Sized,
{
    let mut stats = GenerationStats {
        chunks_visited: mesher.layout().chunk_count(),
        solid_voxels,
        ..Default::default()
    };

    for (coord, mesh) in mesher.extract_all() {
        log::debug!("{:?} chunk {}: {} quads", layer, coord, mesh.quad_count());
        stats.chunks_emitted += 1;
        stats.quads_emitted += mesh.quad_count();
        sink.on_chunk_ready(layer, coord, mesh);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use glam::Vec3;

    fn small_config() -> GenerationConfig {
        GenerationConfig {
            seed: 1,
            map_width: 32,
            map_height: 32,
            map_length: 32,
            chunk_size: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GenerationConfig { chunk_size: 0, ..Default::default() };
        assert!(matches!(GenerationPipeline::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_terrain_end_to_end() {
        let pipeline = GenerationPipeline::new(small_config()).unwrap();
        let mut chunks = Vec::new();
        let stats = pipeline.run_terrain(&mut |layer: MeshLayer, coord: ChunkCoord, mesh: MeshBuffers| {
            chunks.push((layer, coord, mesh));
        });

        assert_eq!(stats.chunks_visited, 8);
        assert_eq!(stats.chunks_emitted, chunks.len());
        assert!(stats.chunks_emitted > 0);
        assert!(stats.solid_voxels > 0);
        assert_eq!(stats.quads_emitted, chunks.iter().map(|(_, _, m)| m.quad_count()).sum::<usize>());

        for (layer, coord, mesh) in &chunks {
            assert_eq!(*layer, MeshLayer::Terrain);
            assert!((0..2).contains(&coord.x) && (0..2).contains(&coord.y) && (0..2).contains(&coord.z));
            assert!(!mesh.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
            let top_faces = mesh.normals.iter().filter(|n| **n == Vec3::Y).count() / 4;
            assert!(top_faces > 0, "chunk {} has no upward faces", coord);
        }
    }

    #[test]
    fn test_terrain_is_centered() {
        let pipeline = GenerationPipeline::new(small_config()).unwrap();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        pipeline.run_terrain(&mut |_: MeshLayer, _: ChunkCoord, mesh: MeshBuffers| {
            for p in &mesh.positions {
                min = min.min(*p);
                max = max.max(*p);
            }
        });
        assert!(min.x >= -16.0 && max.x <= 16.0);
        assert!(min.z >= -16.0 && max.z <= 16.0);
        assert!(min.y >= 0.0 && max.y <= 32.0);
    }

    #[test]
    fn test_terrain_deterministic() {
        let pipeline = GenerationPipeline::new(small_config()).unwrap();
        let collect = || {
            let mut out = Vec::new();
            pipeline.run_terrain(&mut |_: MeshLayer, coord: ChunkCoord, mesh: MeshBuffers| {
                out.push((coord, mesh));
            });
            out
        };
        assert_eq!(collect(), collect());
    }

    #[test]
    fn test_empty_terrain_emits_nothing() {
        let config = GenerationConfig { density: 0.0, ground_start: 0, ..small_config() };
        let pipeline = GenerationPipeline::new(config).unwrap();
        let mut calls = 0;
        let stats = pipeline.run_terrain(&mut |_: MeshLayer, _: ChunkCoord, _: MeshBuffers| calls += 1);

        assert_eq!(calls, 0);
        assert_eq!(stats.chunks_visited, 8);
        assert_eq!(stats.chunks_emitted, 0);
        assert_eq!(stats.solid_voxels, 0);
    }

    #[test]
    fn test_tree_meshing_layers() {
        let pipeline = GenerationPipeline::new(GenerationConfig::default()).unwrap();
        let tree = pipeline.generate_tree(3.0, 7.0);

        let mut layers = Vec::new();
        let stats = pipeline.mesh_tree(&tree, &mut |layer: MeshLayer, _: ChunkCoord, mesh: MeshBuffers| {
            assert!(!mesh.is_empty());
            layers.push(layer);
        });

        assert!(layers.contains(&MeshLayer::Wood));
        let first_leaf = layers.iter().position(|l| *l == MeshLayer::Leaves).unwrap_or(layers.len());
        assert!(layers[..first_leaf].iter().all(|l| *l == MeshLayer::Wood));
        assert_eq!(stats.chunks_emitted, layers.len());
        assert_eq!(stats.solid_voxels, tree.wood.solid_count() + tree.leaves.solid_count());
    }

    #[test]
    fn test_crossed_leaf_style() {
        let mut config = GenerationConfig::default();
        config.tree.leaf_mesh = MeshStyle::CrossedPlanes;
        let pipeline = GenerationPipeline::new(config).unwrap();
        assert_eq!(pipeline.leaf_mesh(), MeshStyle::CrossedPlanes);

        let tree = pipeline.generate_tree(3.0, 7.0);
        let mut leaf_quads = 0;
        pipeline.mesh_tree(&tree, &mut |layer: MeshLayer, _: ChunkCoord, mesh: MeshBuffers| {
            if layer == MeshLayer::Leaves {
                leaf_quads += mesh.quad_count();
            }
        });
        assert_eq!(leaf_quads, tree.leaves.solid_count() * 3);
    }

    #[test]
    fn test_struct_sink() {
        #[derive(Default)]
        struct Counter {
            quads: usize,
        }
        impl ChunkSink for Counter {
            fn on_chunk_ready(&mut self, _: MeshLayer, _: ChunkCoord, mesh: MeshBuffers) {
                self.quads += mesh.quad_count();
            }
        }

        let pipeline = GenerationPipeline::new(small_config()).unwrap();
        let mut counter = Counter::default();
        let stats = pipeline.run_terrain(&mut counter);
        assert_eq!(counter.quads, stats.quads_emitted);
    }
}
