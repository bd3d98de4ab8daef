//! Heightmap, fissure, and terrain voxel generation

pub mod heightmap;
pub mod fissure;
pub mod generator;

pub use heightmap::{HeightCell, HeightmapGenerator, HeightmapParams, ScalarField2D};
pub use fissure::{ChildPolicy, FissureTracer, TraceReport, TracedPoint};
pub use generator::{TerrainGenerator, TerrainParams};
