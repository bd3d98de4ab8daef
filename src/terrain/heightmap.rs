//! Two-channel heightmap: per-column ground level and crack depth.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::fissure::{FissureTracer, TraceReport};
use crate::generation::noise::NoiseSampler;

/// One heightmap column.
///
/// A cell is either ground or crack: carving a crack moves the ground level
/// into `crack` and zeroes `ground`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeightCell {
    pub ground: f32,
    pub crack: f32,
}

impl HeightCell {
    pub fn ground(level: f32) -> Self {
        Self { ground: level, crack: 0.0 }
    }

    pub fn is_crack(&self) -> bool {
        self.crack > 0.0
    }
}

/// Dense W×H grid of [`HeightCell`]s.
///
/// Out-of-range reads return an all-zero cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField2D {
    width: u32,
    height: u32,
    cells: Vec<HeightCell>,
}

impl ScalarField2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![HeightCell::default(); width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(i32, i32) -> HeightCell) -> Self {
        let mut field = Self::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let i = y as usize * width as usize + x as usize;
                field.cells[i] = f(x, y);
            }
        }
        field
    }

    /// Field with the same ground level everywhere and no cracks.
    pub fn filled(width: u32, height: u32, ground: f32) -> Self {
        Self::from_fn(width, height, |_, _| HeightCell::ground(ground))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> HeightCell {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or_default()
    }

    #[inline]
    pub fn ground_level(&self, x: i32, y: i32) -> f32 {
        self.get(x, y).ground
    }

    #[inline]
    pub fn crack_depth(&self, x: i32, y: i32) -> f32 {
        self.get(x, y).crack
    }

    pub fn crack_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_crack()).count()
    }

    pub fn cells(&self) -> &[HeightCell] {
        &self.cells
    }

    /// Convert a ground cell into a crack cell.
    ///
    /// Cells that already carry a crack, and out-of-range cells, are left
    /// untouched. Returns whether the cell became a crack.
    pub(crate) fn carve(&mut self, x: i32, y: i32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[i];
        if cell.crack != 0.0 {
            return false;
        }
        *cell = HeightCell { ground: 0.0, crack: cell.ground };
        cell.is_crack()
    }
}

/// Parameters for [`HeightmapGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Frequency of the single-octave ground noise
    pub frequency: f32,
    /// Heading of the first root crack, in degrees
    pub crack_angle: i32,
    pub crack_length: i32,
    pub crack_thickness: i32,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            frequency: 0.03,
            crack_angle: 45,
            crack_length: 20,
            crack_thickness: 8,
        }
    }
}

/// Builds a [`ScalarField2D`] from ground noise plus one fissure through the center.
pub struct HeightmapGenerator {
    params: HeightmapParams,
}

impl HeightmapGenerator {
    pub fn new(params: HeightmapParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }

    /// Generate the field for a seed. Identical inputs give identical fields.
    pub fn generate(&self, seed: i32, width: u32, height: u32) -> ScalarField2D {
        self.generate_with_report(seed, width, height).0
    }

    pub fn generate_with_report(&self, seed: i32, width: u32, height: u32) -> (ScalarField2D, TraceReport) {
        let noise = NoiseSampler::new(seed);
        let freq = self.params.frequency;
        let mut field = ScalarField2D::from_fn(width, height, |x, y| {
            HeightCell::ground(noise.sample2d(x as f32, y as f32, freq))
        });

        let mut rng = ChaCha8Rng::seed_from_u64(seed as i64 as u64);
        let report = FissureTracer::new(&mut field, &mut rng).fissure(
            self.params.crack_angle,
            width as i32 / 2,
            height as i32 / 2,
            self.params.crack_length,
            self.params.crack_thickness,
        );

        log::debug!(
            "Heightmap {}x{} (seed {}): {} crack cells from {} trace segments",
            width, height, seed, field.crack_cells(), report.segments
        );

        (field, report)
    }
}

impl Default for HeightmapGenerator {
    fn default() -> Self {
        Self::new(HeightmapParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_reads_zero() {
        let field = ScalarField2D::filled(4, 4, 1.0);
        assert_eq!(field.get(-1, 0), HeightCell::default());
        assert_eq!(field.ground_level(4, 0), 0.0);
        assert_eq!(field.crack_depth(0, 4), 0.0);
        assert_eq!(field.ground_level(3, 3), 1.0);
    }

    #[test]
    fn test_carve_moves_ground_into_crack() {
        let mut field = ScalarField2D::filled(4, 4, 0.7);
        assert!(field.carve(1, 1));
        assert_eq!(field.get(1, 1), HeightCell { ground: 0.0, crack: 0.7 });
    }

    #[test]
    fn test_carve_never_overwrites_crack() {
        let mut field = ScalarField2D::from_fn(4, 4, |x, _| {
            if x == 2 {
                HeightCell { ground: 0.0, crack: 0.3 }
            } else {
                HeightCell::ground(0.9)
            }
        });
        assert!(!field.carve(2, 1));
        assert_eq!(field.crack_depth(2, 1), 0.3);
        assert!(!field.carve(10, 10));
    }

    #[test]
    fn test_ground_values_in_unit_range() {
        let field = HeightmapGenerator::default().generate(3, 48, 40);
        assert_eq!(field.width(), 48);
        assert_eq!(field.height(), 40);
        for cell in field.cells() {
            assert!((0.0..=1.0).contains(&cell.ground));
            assert!((0.0..=1.0).contains(&cell.crack));
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let generator = HeightmapGenerator::default();
        let a = generator.generate(11, 64, 64);
        let b = generator.generate(11, 64, 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cells_are_ground_or_crack() {
        let field = HeightmapGenerator::default().generate(1, 64, 64);
        assert!(field.crack_cells() > 0, "fissure should carve the center");
        for cell in field.cells() {
            assert!(!(cell.ground > 0.0 && cell.crack > 0.0), "cell is both ground and crack: {:?}", cell);
        }
    }

    #[test]
    fn test_center_is_cracked() {
        let field = HeightmapGenerator::default().generate(2, 64, 64);
        assert!(field.get(32, 32).is_crack());
    }
}
