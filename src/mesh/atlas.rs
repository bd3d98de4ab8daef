//! Texture-atlas UV selection per face

use glam::Vec2;

use super::face::Face;

/// Picks atlas UVs for a quad, in `[tl, tr, bl, br]` order.
pub trait UvMapper: Sync {
    /// `top_y` is the grid-space height of the quad's top-left corner.
    fn face_uvs(&self, face: Face, top_y: f32) -> [Vec2; 4];
}

/// Terrain atlas: ten height bands stacked vertically, with a side
/// column starting at u = 0 and a top column starting at u = 0.6.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainAtlas {
    map_height: u32,
}

impl TerrainAtlas {
    const BAND: f32 = 0.1;
    const COLUMN_WIDTH: f32 = 0.3;
    const TOP_COLUMN: f32 = 0.6;

    pub fn new(map_height: u32) -> Self {
        Self { map_height: map_height.max(1) }
    }

    /// Bottom v of the band for a height, clamped to the last band.
    ///
    /// A quad topping out at `map_height` would otherwise index band 10,
    /// one past the atlas; it gets 0.9 instead of 1.0.
    pub fn band(&self, top_y: f32) -> f32 {
        let height = top_y.round();
        let band = (10.0 / self.map_height as f32 * height) as i32;
        (band.clamp(0, 9) as f32) * Self::BAND
    }
}

impl UvMapper for TerrainAtlas {
    fn face_uvs(&self, face: Face, top_y: f32) -> [Vec2; 4] {
        let v = self.band(top_y);
        let u = if face == Face::Top { Self::TOP_COLUMN } else { 0.0 };
        let (u1, v1) = (u + Self::COLUMN_WIDTH, v + Self::BAND);
        [Vec2::new(u, v), Vec2::new(u, v1), Vec2::new(u1, v), Vec2::new(u1, v1)]
    }
}

/// Tree atlas: the right half for top faces, the left half for everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TreeAtlas;

impl UvMapper for TreeAtlas {
    fn face_uvs(&self, face: Face, _top_y: f32) -> [Vec2; 4] {
        let u = if face == Face::Top { 0.5 } else { 0.0 };
        [Vec2::new(u, 0.0), Vec2::new(u, 1.0), Vec2::new(u + 0.5, 0.0), Vec2::new(u + 0.5, 1.0)]
    }
}
