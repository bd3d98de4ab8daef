//! Procedural generation of tree volumes and sprites

pub mod tree;
pub mod sprite;

pub use tree::{BranchGrower, GrowthReport, TreeGenerator, TreeShape, TreeVolume};
pub use sprite::{SpriteCell, SpriteGenerator, SpriteParams, TreeSprite};
