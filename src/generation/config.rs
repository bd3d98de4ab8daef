//! Generation configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::mesh::MeshStyle;
use crate::terrain::generator::TerrainParams;
use crate::voxel::chunk::DEFAULT_CHUNK_SIZE;

/// Largest accepted map axis, in voxels.
pub const MAX_MAP_AXIS: u32 = 256;
/// Largest accepted chunk edge, in voxels.
pub const MAX_CHUNK_SIZE: u32 = 64;

/// Tree generation and meshing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub chunk_size: u32,
    /// Shift applied to the tree noise sampler
    pub noise_offset: i32,
    /// How leaf voxels are meshed. Wood is always culled.
    pub leaf_mesh: MeshStyle,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            noise_offset: 0,
            leaf_mesh: MeshStyle::Culled,
        }
    }
}

/// Configuration for the generation pipeline.
///
/// Missing JSON fields take their default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Shifts every noise sample and seeds the fissure RNG.
    pub seed: i32,
    pub map_width: u32,
    pub map_height: u32,
    pub map_length: u32,
    pub chunk_size: u32,
    /// Cave-noise threshold in [0, 1]
    pub density: f32,
    /// Voxel height reached by a ground level of 1.0
    pub ground_start: i32,
    pub tree: TreeConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map_width: 64,
            map_height: 32,
            map_length: 64,
            chunk_size: DEFAULT_CHUNK_SIZE,
            density: 0.45,
            ground_start: 15,
            tree: TreeConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded generation config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generators cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in [
            ("map_width", self.map_width),
            ("map_height", self.map_height),
            ("map_length", self.map_length),
        ] {
            if value == 0 || value > MAX_MAP_AXIS {
                return Err(Error::Config(format!(
                    "{} must be in 1..={}, got {}",
                    axis, MAX_MAP_AXIS, value
                )));
            }
        }

        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::Config(format!(
                "chunk_size must be in 1..={}, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }
        let smallest_axis = self.map_width.min(self.map_height).min(self.map_length);
        if self.chunk_size > smallest_axis {
            return Err(Error::Config(format!(
                "chunk_size {} exceeds the smallest map axis {}",
                self.chunk_size, smallest_axis
            )));
        }

        if !self.density.is_finite() || !(0.0..=1.0).contains(&self.density) {
            return Err(Error::Config(format!("density must be in [0, 1], got {}", self.density)));
        }
        if self.ground_start < 0 {
            return Err(Error::Config(format!(
                "ground_start must not be negative, got {}",
                self.ground_start
            )));
        }
        if self.tree.chunk_size == 0 || self.tree.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::Config(format!(
                "tree.chunk_size must be in 1..={}, got {}",
                MAX_CHUNK_SIZE, self.tree.chunk_size
            )));
        }

        Ok(())
    }

    /// Terrain population parameters for this config.
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            seed: self.seed,
            width: self.map_width,
            height: self.map_height,
            length: self.map_length,
            ground_start: self.ground_start,
            density: self.density,
            ..Default::default()
        }
    }
}
