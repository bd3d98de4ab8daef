//! Dense 3D voxel grid with permissive bounds handling.
//!
//! Reads outside the grid return the default (empty) value and writes
//! outside the grid are dropped. Generators rely on this at grid edges
//! instead of clipping every stamp themselves.

use glam::{IVec3, UVec3};

/// A voxel value that is either solid or empty.
pub trait Occupancy: Copy + Default + PartialEq + Send + Sync {
    fn is_solid(&self) -> bool;
}

impl Occupancy for bool {
    #[inline]
    fn is_solid(&self) -> bool {
        *self
    }
}

/// Material tag for tree volumes.
///
/// Wood and leaves live in two parallel grids so leaf stamping can consult
/// the wood grid without ever overwriting it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TreeVoxel {
    #[default]
    Empty = 0,
    Wood = 1,
    Leaf = 2,
}

impl Occupancy for TreeVoxel {
    #[inline]
    fn is_solid(&self) -> bool {
        *self != TreeVoxel::Empty
    }
}

/// Dense row-major 3D array (x fastest, then y, then z).
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid3D<T> {
    dims: UVec3,
    data: Vec<T>,
}

impl<T: Occupancy> VoxelGrid3D<T> {
    /// Create a grid filled with the empty value.
    pub fn new(width: u32, height: u32, length: u32) -> Self {
        let len = width as usize * height as usize * length as usize;
        Self {
            dims: UVec3::new(width, height, length),
            data: vec![T::default(); len],
        }
    }

    /// Create a grid by evaluating `f` at every cell.
    pub fn from_fn(width: u32, height: u32, length: u32, mut f: impl FnMut(i32, i32, i32) -> T) -> Self {
        let mut grid = Self::new(width, height, length);
        for z in 0..length as i32 {
            for y in 0..height as i32 {
                for x in 0..width as i32 {
                    let i = grid.index_unchecked(x, y, z);
                    grid.data[i] = f(x, y, z);
                }
            }
        }
        grid
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.x
    }

    pub fn height(&self) -> u32 {
        self.dims.y
    }

    pub fn length(&self) -> u32 {
        self.dims.z
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && y >= 0 && z >= 0
            && (x as u32) < self.dims.x
            && (y as u32) < self.dims.y
            && (z as u32) < self.dims.z
    }

    #[inline]
    fn index_unchecked(&self, x: i32, y: i32, z: i32) -> usize {
        let (w, h) = (self.dims.x as usize, self.dims.y as usize);
        (z as usize * h + y as usize) * w + x as usize
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        self.in_bounds(x, y, z).then(|| self.index_unchecked(x, y, z))
    }

    /// Value at a cell; out-of-range reads return the empty value.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> T {
        self.index(x, y, z).map(|i| self.data[i]).unwrap_or_default()
    }

    #[inline]
    pub fn get_at(&self, pos: IVec3) -> T {
        self.get(pos.x, pos.y, pos.z)
    }

    /// Write a cell. Returns false (and does nothing) when out of range.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: T) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn set_at(&mut self, pos: IVec3, value: T) -> bool {
        self.set(pos.x, pos.y, pos.z, value)
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_solid()
    }

    pub fn solid_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_solid()).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|v| v.is_solid())
    }

    /// Raw cell slice in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid: VoxelGrid3D<bool> = VoxelGrid3D::new(4, 5, 6);
        assert_eq!(grid.dims(), UVec3::new(4, 5, 6));
        assert_eq!(grid.as_slice().len(), 120);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_set_get() {
        let mut grid: VoxelGrid3D<bool> = VoxelGrid3D::new(4, 4, 4);
        assert!(grid.set(1, 2, 3, true));
        assert!(grid.get(1, 2, 3));
        assert!(!grid.get(3, 2, 1));
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut grid: VoxelGrid3D<TreeVoxel> = VoxelGrid3D::new(4, 4, 4);
        assert!(!grid.set(-1, 0, 0, TreeVoxel::Wood));
        assert!(!grid.set(0, 4, 0, TreeVoxel::Wood));
        assert!(!grid.set(0, 0, 100, TreeVoxel::Wood));
        assert!(grid.is_empty());
        assert_eq!(grid.get(-1, -1, -1), TreeVoxel::Empty);
        assert_eq!(grid.get(4, 0, 0), TreeVoxel::Empty);
    }

    #[test]
    fn test_row_major_layout() {
        let grid = VoxelGrid3D::from_fn(3, 2, 2, |x, y, z| x == 1 && y == 1 && z == 1);
        // (z * h + y) * w + x = (1 * 2 + 1) * 3 + 1
        assert!(grid.as_slice()[10]);
        assert_eq!(grid.solid_count(), 1);
    }

    #[test]
    fn test_tree_voxel_occupancy() {
        assert!(!TreeVoxel::Empty.is_solid());
        assert!(TreeVoxel::Wood.is_solid());
        assert!(TreeVoxel::Leaf.is_solid());
        assert_eq!(TreeVoxel::default(), TreeVoxel::Empty);
    }
}
