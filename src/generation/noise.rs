//! Smooth-noise sampling shared by every generator.
//!
//! All samples are gradient noise remapped to `[0, 1]`. The 3D variants are
//! not true volumetric noise: they average the six ordered axis-pair 2D
//! samples, which removes the directional bias a single 2D slice would show
//! along any one axis.

use noise::{NoiseFn, Perlin};

/// Default frequency for the fractal and ridged variants.
pub const DEFAULT_FREQUENCY: f32 = 0.05;
/// Default per-octave amplitude falloff.
pub const DEFAULT_GAIN: f32 = 0.5;
/// Default number of octaves summed by the fractal variant.
pub const DEFAULT_OCTAVES: u32 = 16;

/// Deterministic noise sampler with a coordinate offset.
///
/// The offset is added to both coordinates before scaling by the frequency,
/// so `sample2d(x, y, f)` evaluates noise at `((x + offset) * f, (y + offset) * f)`.
#[derive(Clone, Debug)]
pub struct NoiseSampler {
    perlin: Perlin,
    offset: f64,
}

impl NoiseSampler {
    /// Create a sampler whose coordinates are shifted by `offset` (usually the run seed).
    pub fn new(offset: i32) -> Self {
        Self {
            perlin: Perlin::new(Perlin::DEFAULT_SEED),
            offset: offset as f64,
        }
    }

    /// Sampler with no coordinate shift.
    pub fn unshifted() -> Self {
        Self::new(0)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Single-octave 2D sample in `[0, 1]`.
    pub fn sample2d(&self, x: f32, y: f32, frequency: f32) -> f32 {
        let f = frequency as f64;
        let nx = (x as f64 + self.offset) * f;
        let ny = (y as f64 + self.offset) * f;
        let raw = self.perlin.get([nx, ny]);
        (((raw + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }

    /// Mean of the six ordered axis-pair samples.
    pub fn sample3d(&self, x: f32, y: f32, z: f32, frequency: f32) -> f32 {
        symmetrize(x, y, z, |a, b| self.sample2d(a, b, frequency))
    }

    /// Ridged 2D sample: 1 at a raw value of 0.5, falling to 0 at either extreme.
    pub fn ridged2d(&self, x: f32, y: f32, frequency: f32) -> f32 {
        ridge(self.sample2d(x, y, frequency))
    }

    pub fn ridged3d(&self, x: f32, y: f32, z: f32, frequency: f32) -> f32 {
        symmetrize(x, y, z, |a, b| self.ridged2d(a, b, frequency))
    }

    /// Multi-octave sum with frequency doubling and geometric amplitude decay.
    ///
    /// The first octave is weighted by `gain`, so with the default gain of 0.5
    /// the result stays below 1.
    pub fn fractal2d(&self, x: f32, y: f32, frequency: f32, gain: f32, octaves: u32) -> f32 {
        let mut total = 0.0;
        let mut freq = frequency;
        let mut amplitude = gain;
        for _ in 0..octaves {
            total += self.sample2d(x, y, freq) * amplitude;
            freq *= 2.0;
            amplitude *= gain;
        }
        total
    }

    /// Symmetrized [`fractal2d`](Self::fractal2d) with the default parameters.
    pub fn fractal3d(&self, x: f32, y: f32, z: f32) -> f32 {
        symmetrize(x, y, z, |a, b| {
            self.fractal2d(a, b, DEFAULT_FREQUENCY, DEFAULT_GAIN, DEFAULT_OCTAVES)
        })
    }
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::unshifted()
    }
}

/// Fold a `[0, 1]` sample around 0.5.
pub fn ridge(n: f32) -> f32 {
    2.0 * (0.5 - (0.5 - n).abs())
}

fn symmetrize(x: f32, y: f32, z: f32, f: impl Fn(f32, f32) -> f32) -> f32 {
    let xy = f(x, y);
    let yz = f(y, z);
    let xz = f(x, z);
    let yx = f(y, x);
    let zy = f(z, y);
    let zx = f(z, x);
    (xy + yz + xz + yx + zy + zx) / 6.0
}
