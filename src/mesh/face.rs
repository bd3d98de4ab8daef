//! The six axis-aligned voxel faces and their quad geometry

use glam::{IVec3, Vec3};

/// One face of a unit voxel, named by the side it faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// -X
    Left,
    /// +X
    Right,
    /// -Z
    Front,
    /// +Z
    Back,
    /// +Y
    Top,
    /// -Y
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::Left, Face::Right, Face::Front, Face::Back, Face::Top, Face::Bottom];

    /// Offset to the neighboring voxel this face looks at
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Left => IVec3::NEG_X,
            Face::Right => IVec3::X,
            Face::Front => IVec3::NEG_Z,
            Face::Back => IVec3::Z,
            Face::Top => IVec3::Y,
            Face::Bottom => IVec3::NEG_Y,
        }
    }

    /// Outward unit normal
    pub fn normal(self) -> Vec3 {
        self.offset().as_vec3()
    }

    /// Corner origin and edge vectors `(base, u, v)` of the face quad
    /// relative to the voxel's minimum corner, with `u × v` pointing outward.
    fn frame(self) -> (Vec3, Vec3, Vec3) {
        match self {
            Face::Left => (Vec3::ZERO, Vec3::Z, Vec3::Y),
            Face::Right => (Vec3::new(1.0, 0.0, 1.0), Vec3::NEG_Z, Vec3::Y),
            Face::Front => (Vec3::X, Vec3::NEG_X, Vec3::Y),
            Face::Back => (Vec3::Z, Vec3::X, Vec3::Y),
            Face::Top => (Vec3::new(0.0, 1.0, 1.0), Vec3::X, Vec3::NEG_Z),
            Face::Bottom => (Vec3::ZERO, Vec3::X, Vec3::Z),
        }
    }

    /// Quad corners in `[top-left, top-right, bottom-left, bottom-right]`
    /// order for the voxel whose minimum corner is `voxel`.
    ///
    /// Triangles `(tl, bl, br)` and `(tl, br, tr)` wind counter-clockwise
    /// when seen from outside.
    pub fn corners(self, voxel: Vec3) -> [Vec3; 4] {
        let (base, u, v) = self.frame();
        Self::quad(voxel + base, u, v)
    }

    /// Corners of a plane through the voxel center, parallel to this face.
    pub fn mid_plane_corners(self, voxel: Vec3) -> [Vec3; 4] {
        let (base, u, v) = self.frame();
        Self::quad(voxel + base - self.normal() * 0.5, u, v)
    }

    fn quad(bl: Vec3, u: Vec3, v: Vec3) -> [Vec3; 4] {
        [bl + v, bl + u + v, bl, bl + u]
    }
}
