//! Heightmap-driven terrain voxel population

use crate::generation::noise::NoiseSampler;
use crate::terrain::heightmap::ScalarField2D;
use crate::voxel::grid::VoxelGrid3D;

/// Parameters controlling terrain population
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    pub seed: i32,
    pub width: u32,
    pub height: u32,
    pub length: u32,
    /// Voxel height reached by a ground level of 1.0
    pub ground_start: i32,
    /// Cave-noise threshold; lower values give less extra rock above the ground
    pub density: f32,
    /// Frequency of the 3D cave noise
    pub cave_frequency: f32,
    /// Crack columns stay open at least this deep before crack depth scaling
    pub crack_floor: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 64,
            height: 32,
            length: 64,
            ground_start: 15,
            density: 0.45,
            cave_frequency: 0.06,
            crack_floor: 10.0,
        }
    }
}

/// Expands a [`ScalarField2D`] into a boolean occupancy grid.
///
/// A voxel is solid when it lies below the column's ground surface, or when
/// the 3D cave noise falls under `density` and the voxel is not inside the
/// open shaft of a crack column.
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: NoiseSampler,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        let noise = NoiseSampler::new(params.seed);
        Self { params, noise }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Occupancy of a single voxel given its column's heightmap values.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32, ground: f32, crack: f32) -> bool {
        let p = &self.params;
        let yf = y as f32;
        let gs = p.ground_start as f32;

        if yf < ground * gs {
            return true;
        }
        let in_crack_shaft = crack > 0.0 && yf < p.crack_floor + crack * gs;
        !in_crack_shaft
            && self.noise.sample3d(x as f32, yf, z as f32, p.cave_frequency) < p.density
    }

    /// Populate a `width × height × length` grid. The field is indexed by (x, z).
    pub fn populate(&self, field: &ScalarField2D) -> VoxelGrid3D<bool> {
        let p = &self.params;
        let start = std::time::Instant::now();

        let grid = VoxelGrid3D::from_fn(p.width, p.height, p.length, |x, y, z| {
            let cell = field.get(x, z);
            self.is_solid(x, y, z, cell.ground, cell.crack)
        });

        log::info!(
            "Populated {}x{}x{} terrain: {} solid voxels in {:.1}ms",
            p.width, p.height, p.length,
            grid.solid_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        grid
    }
}
