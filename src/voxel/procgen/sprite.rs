//! Flat 2D tree sprite built from the fissure tracer.
//!
//! The trunk and branches are a binary-branching trace across a field of
//! full ground; leaves are speckled around the traced cells wherever a 2D
//! noise sample stays under a density threshold.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::generation::noise::NoiseSampler;
use crate::terrain::fissure::{ChildPolicy, FissureTracer};
use crate::terrain::heightmap::ScalarField2D;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpriteCell {
    #[default]
    Empty,
    Branch,
    Leaf,
}

/// Parameters for [`SpriteGenerator`]
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteParams {
    pub width: u32,
    pub height: u32,
    /// Trunk thickness is drawn from this range
    pub thickness: std::ops::Range<i32>,
    /// Trunk length is drawn from this range
    pub length: std::ops::Range<i32>,
    /// Leaves spread at most this many cells from a branch cell
    pub leaf_distance: i32,
    pub leaf_density: f32,
    pub leaf_frequency: f32,
}

impl Default for SpriteParams {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            thickness: 2..11,
            length: 10..30,
            leaf_distance: 10,
            leaf_density: 0.6,
            leaf_frequency: 0.1,
        }
    }
}

/// A generated sprite, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeSprite {
    pub width: u32,
    pub height: u32,
    /// Trunk thickness and length drawn for this sprite
    pub thickness: i32,
    pub length: i32,
    cells: Vec<SpriteCell>,
}

impl TreeSprite {
    pub fn get(&self, x: i32, y: i32) -> SpriteCell {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return SpriteCell::Empty;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn count(&self, kind: SpriteCell) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }

    pub fn cells(&self) -> &[SpriteCell] {
        &self.cells
    }
}

pub struct SpriteGenerator {
    params: SpriteParams,
    noise: NoiseSampler,
}

impl SpriteGenerator {
    pub fn new(params: SpriteParams) -> Self {
        Self { params, noise: NoiseSampler::unshifted() }
    }

    /// Trunk row: the trunk starts at the left edge, ten cells below center.
    fn trunk_y(&self) -> i32 {
        self.params.height as i32 / 2 - 10
    }

    pub fn generate(&self, seed: u64) -> TreeSprite {
        let p = &self.params;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let thickness = rng.gen_range(p.thickness.clone());
        let length = rng.gen_range(p.length.clone());

        let mut field = ScalarField2D::filled(p.width, p.height, 1.0);
        FissureTracer::new(&mut field, &mut rng)
            .with_policy(ChildPolicy::Binary)
            .trace(0, 0, self.trunk_y(), length, thickness);

        let mut cells: Vec<SpriteCell> = field
            .cells()
            .iter()
            .map(|c| if c.is_crack() { SpriteCell::Branch } else { SpriteCell::Empty })
            .collect();
        self.add_leaves(&mut cells, thickness, length);

        TreeSprite { width: p.width, height: p.height, thickness, length, cells }
    }

    fn add_leaves(&self, cells: &mut [SpriteCell], thickness: i32, length: i32) {
        let p = &self.params;
        let (w, h) = (p.width as i32, p.height as i32);
        let trunk_y = self.trunk_y();
        let trunk_radius = (thickness + 4) / 2;
        let d = p.leaf_distance;

        for y in 0..h {
            for x in 0..w {
                let in_trunk = y > trunk_y - trunk_radius && y < trunk_y + trunk_radius && x < length + 3;
                if in_trunk || cells[(y * w + x) as usize] != SpriteCell::Branch {
                    continue;
                }
                for ny in (y - d).max(0)..=(y + d).min(h - 1) {
                    for nx in (x - d).max(0)..=(x + d).min(w - 1) {
                        let i = (ny * w + nx) as usize;
                        if cells[i] != SpriteCell::Empty {
                            continue;
                        }
                        if self.noise.sample2d(nx as f32, ny as f32, p.leaf_frequency) < p.leaf_density {
                            cells[i] = SpriteCell::Leaf;
                        }
                    }
                }
            }
        }
    }
}

impl Default for SpriteGenerator {
    fn default() -> Self {
        Self::new(SpriteParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_has_trunk_at_left_edge() {
        let sprite = SpriteGenerator::default().generate(1);
        assert_eq!(sprite.get(0, 90), SpriteCell::Branch);
        assert!((2..11).contains(&sprite.thickness));
        assert!((10..30).contains(&sprite.length));
        assert!(sprite.count(SpriteCell::Branch) > 0);
    }

    #[test]
    fn test_sprite_grows_leaves() {
        let sprite = SpriteGenerator::default().generate(8);
        assert!(sprite.count(SpriteCell::Leaf) > 0);
    }

    #[test]
    fn test_leaves_only_near_branches() {
        let sprite = SpriteGenerator::default().generate(3);
        for y in 0..sprite.height as i32 {
            for x in 0..sprite.width as i32 {
                if sprite.get(x, y) != SpriteCell::Leaf {
                    continue;
                }
                let near = (-10..=10).any(|dy| {
                    (-10..=10).any(|dx| sprite.get(x + dx, y + dy) == SpriteCell::Branch)
                });
                assert!(near, "leaf at ({}, {}) is far from every branch", x, y);
            }
        }
    }

    #[test]
    fn test_sprite_deterministic() {
        let generator = SpriteGenerator::default();
        assert_eq!(generator.generate(77), generator.generate(77));
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let sprite = SpriteGenerator::default().generate(2);
        assert_eq!(sprite.get(-1, 0), SpriteCell::Empty);
        assert_eq!(sprite.get(0, 500), SpriteCell::Empty);
    }
}
