//! Procedural tree generation by fractal branching
//!
//! A branch walks a cursor from its start toward a target one unit at a
//! time, stamping a disc of wood perpendicular to its heading. Branches at
//! the deepest level also stamp a sphere of leaves around every wood cell;
//! leaves never replace wood, and later wood clears leaves. Clearing keeps
//! the two grids disjoint: a leaf stamped by an earlier step does not
//! survive under a disc stamped later, so the leaf grid can hold fewer cells
//! than a skip-only rule would leave behind.
//! When a branch finishes, a noise sample at its tip picks which of four
//! diagonal children spawn; each child is one unit thinner and 80% as long.
//!
//! Growth runs on an explicit work stack in the same depth-first order as
//! the recursive formulation. No RNG is involved: every choice comes from
//! the noise field, so a tree is a pure function of its position.

use glam::{IVec3, Vec3};

use crate::generation::noise::NoiseSampler;
use crate::voxel::grid::{TreeVoxel, VoxelGrid3D};

/// Depth of the trunk call; depth counts up from here.
pub const ROOT_DEPTH: u32 = 1;
/// Deepest branch level. Only branches at this depth grow leaves.
pub const MAX_BRANCH_DEPTH: u32 = 6;

/// A walk ends once the cursor is this close to its target.
const ARRIVAL_DISTANCE: f32 = 0.5;
const LENGTH_DECAY: f32 = 0.8;
const BRANCH_NOISE_FREQUENCY: f32 = 0.1;
/// Branch-count samples are scaled to `[0, 12]`.
const BRANCH_COUNT_SCALE: f32 = 12.0;
/// Occupancy threshold for [`TreeGenerator::fill_fractal`].
const FRACTAL_FILL_THRESHOLD: f32 = 0.45;

/// Child directions as (right sign, up sign); every child also moves forward.
const CHILD_DIRECTIONS: [(f32, f32); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];

/// Position and orientation of a growing branch tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchCursor {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl BranchCursor {
    /// Cursor at `position` facing +Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
        }
    }

    /// Turn to face `target`, keeping `up` as close to world +Y as possible.
    ///
    /// Facing straight up or down has no unique roll; `right` falls back to +X.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
        self.forward = forward;
        self.right = right;
        self.up = forward.cross(right);
    }

    pub fn advance(&mut self) {
        self.position += self.forward;
    }
}

/// Which of the four diagonal children spawn for a branch at `depth` whose
/// tip sampled `count` in `[0, 12]`.
///
/// The bands overlap, so several children can fire for one count, and the
/// first levels of the tree always spawn every child.
pub fn child_branches(depth: u32, count: i32) -> [bool; 4] {
    [
        depth <= 2 || count <= 3 || count > 9,
        depth <= 3 || count == 1 || count > 9 || (count > 3 && count <= 6),
        depth <= 2 || matches!(count, 2 | 5 | 7 | 8) || count > 9,
        depth <= 3 || count == 3 || count == 6 || count > 7,
    ]
}

#[derive(Clone, Copy, Debug)]
struct BranchTask {
    start: Vec3,
    target: Vec3,
    thickness: i32,
    length: i32,
    depth: u32,
}

/// Counters for one growth run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthReport {
    /// Branches that passed the length and depth checks
    pub branches: usize,
    /// Cursor steps taken across all branches
    pub steps: usize,
    pub wood_writes: usize,
    pub leaf_writes: usize,
}

/// Grows branches into a pair of wood and leaf grids.
///
/// World-space positions map to grid cells by rounding and adding `origin`,
/// the cell that holds the tree's world origin.
pub struct BranchGrower<'a> {
    wood: &'a mut VoxelGrid3D<TreeVoxel>,
    leaves: &'a mut VoxelGrid3D<TreeVoxel>,
    noise: &'a NoiseSampler,
    leaf_radius: i32,
    origin: IVec3,
    max_steps: usize,
}

impl<'a> BranchGrower<'a> {
    pub fn new(
        wood: &'a mut VoxelGrid3D<TreeVoxel>,
        leaves: &'a mut VoxelGrid3D<TreeVoxel>,
        noise: &'a NoiseSampler,
        leaf_radius: i32,
    ) -> Self {
        let dims = wood.dims();
        let origin = IVec3::new(dims.x as i32 / 2, 0, dims.z as i32 / 2);
        let max_steps = 2 * (dims.x + dims.y + dims.z) as usize;
        Self { wood, leaves, noise, leaf_radius, origin, max_steps }
    }

    /// Grow a branch from `start` toward `target` and all of its descendants.
    ///
    /// `thickness` is the disc radius in voxels (negative clamps to 0).
    /// Nothing is written when `length <= 0` or `depth > MAX_BRANCH_DEPTH`.
    pub fn grow(&mut self, start: Vec3, target: Vec3, thickness: i32, length: i32, depth: u32) -> GrowthReport {
        let mut report = GrowthReport::default();
        let mut stack = vec![BranchTask { start, target, thickness, length, depth }];

        while let Some(task) = stack.pop() {
            let thickness = task.thickness.max(0);
            if task.length <= 0 || task.depth > MAX_BRANCH_DEPTH {
                continue;
            }
            report.branches += 1;

            let mut cursor = BranchCursor::at(task.start);
            cursor.look_at(task.target);
            let with_leaves = task.depth == MAX_BRANCH_DEPTH;

            let mut steps = 0;
            while cursor.position.distance(task.target) > ARRIVAL_DISTANCE && steps < self.max_steps {
                if !self.contains(cursor.position) {
                    break;
                }
                self.stamp_disc(&cursor, thickness, with_leaves, &mut report);
                cursor.advance();
                steps += 1;
            }
            report.steps += steps;

            let length = (task.length as f32 * LENGTH_DECAY) as i32;
            let tip = cursor.position;
            let count = (self.noise.sample2d(tip.x, tip.z, BRANCH_NOISE_FREQUENCY) * BRANCH_COUNT_SCALE)
                .round() as i32;
            let half = length as f32 / 2.0;
            let spawn = child_branches(task.depth, count);

            // Reverse push keeps the first child on top of the stack.
            for (i, &(right, up)) in CHILD_DIRECTIONS.iter().enumerate().rev() {
                if !spawn[i] {
                    continue;
                }
                let offset = cursor.right * (right * half)
                    + cursor.up * (up * half)
                    + cursor.forward * half;
                stack.push(BranchTask {
                    start: tip,
                    target: tip + offset,
                    thickness: thickness - 1,
                    length,
                    depth: task.depth + 1,
                });
            }
        }

        report
    }

    #[inline]
    fn to_grid(&self, p: Vec3) -> IVec3 {
        p.round().as_ivec3() + self.origin
    }

    fn contains(&self, p: Vec3) -> bool {
        let c = self.to_grid(p);
        self.wood.in_bounds(c.x, c.y, c.z)
    }

    /// Wood disc in the cursor's right/up plane using a true circle test.
    fn stamp_disc(&mut self, cursor: &BranchCursor, radius: i32, with_leaves: bool, report: &mut GrowthReport) {
        for rx in -radius..=radius {
            for rz in -radius..=radius {
                if rx * rx + rz * rz > radius * radius {
                    continue;
                }
                let p = cursor.position + cursor.right * rx as f32 + cursor.up * rz as f32;
                let cell = self.to_grid(p);
                if !self.wood.set_at(cell, TreeVoxel::Wood) {
                    continue;
                }
                // Wood always wins over leaves stamped by an earlier step.
                self.leaves.set_at(cell, TreeVoxel::Empty);
                report.wood_writes += 1;
                if with_leaves {
                    self.stamp_leaves(cell, report);
                }
            }
        }
    }

    /// Leaf sphere around `center`, never covering existing wood.
    fn stamp_leaves(&mut self, center: IVec3, report: &mut GrowthReport) {
        let r = self.leaf_radius;
        for lx in -r..=r {
            for lz in -r..=r {
                for ly in -r..=r {
                    if lx * lx + lz * lz + ly * ly > r * r {
                        continue;
                    }
                    let cell = center + IVec3::new(lx, ly, lz);
                    if self.wood.get_at(cell) == TreeVoxel::Wood {
                        continue;
                    }
                    if self.leaves.set_at(cell, TreeVoxel::Leaf) {
                        report.leaf_writes += 1;
                    }
                }
            }
        }
    }
}

/// Per-tree dimensions derived from noise at the tree's world position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeShape {
    /// Trunk diameter in voxels; the trunk disc radius is half of this
    pub thickness: i32,
    /// Trunk length; also scales the grid
    pub length: i32,
    /// Grid extent along X and Z
    pub size_xz: u32,
    pub size_y: u32,
    pub leaf_radius: i32,
    /// Trunk lean toward -X, in voxels at the trunk top
    pub lean_x: i32,
    /// Trunk lean toward +Z
    pub lean_z: i32,
}

impl TreeShape {
    pub fn from_position(noise: &NoiseSampler, x: f32, z: f32) -> Self {
        let thickness = (noise.sample2d(x, z, 0.08) * 10.0) as i32 + 1;
        let length = (noise.sample2d(x, z, 0.05) * 15.0) as i32 + 1;
        let leaf_radius = (length / 6 + thickness / 5).clamp(2, 5);
        let lean_x = (noise.sample2d(x, z, 0.2) * 6.0).round() as i32 - 3;
        let lean_z = (noise.sample2d(x, z, 0.3) * 6.0).round() as i32 - 3;

        Self {
            thickness,
            length,
            size_xz: 10 * length as u32,
            size_y: 10 * length as u32,
            leaf_radius,
            lean_x,
            lean_z,
        }
    }

    /// Where the trunk grows toward from the origin.
    pub fn trunk_target(&self) -> Vec3 {
        Vec3::new(-self.lean_x as f32, self.length as f32, self.lean_z as f32)
    }
}

/// Wood and leaf grids of one generated tree.
#[derive(Clone, Debug)]
pub struct TreeVolume {
    pub shape: TreeShape,
    pub wood: VoxelGrid3D<TreeVoxel>,
    pub leaves: VoxelGrid3D<TreeVoxel>,
    pub report: GrowthReport,
}

/// Procedural tree generator driven by a noise sampler
pub struct TreeGenerator {
    noise: NoiseSampler,
}

impl TreeGenerator {
    /// Create a generator whose noise is shifted by `noise_offset`
    pub fn new(noise_offset: i32) -> Self {
        Self { noise: NoiseSampler::new(noise_offset) }
    }

    pub fn noise(&self) -> &NoiseSampler {
        &self.noise
    }

    pub fn shape_at(&self, x: f32, z: f32) -> TreeShape {
        TreeShape::from_position(&self.noise, x, z)
    }

    /// Generate the tree standing at world position `(x, z)`.
    pub fn generate(&self, x: f32, z: f32) -> TreeVolume {
        self.generate_shape(self.shape_at(x, z))
    }

    /// Allocate both grids for `shape` and grow the trunk with all its branches.
    pub fn generate_shape(&self, shape: TreeShape) -> TreeVolume {
        let mut wood = VoxelGrid3D::new(shape.size_xz, shape.size_y, shape.size_xz);
        let mut leaves = VoxelGrid3D::new(shape.size_xz, shape.size_y, shape.size_xz);

        let report = BranchGrower::new(&mut wood, &mut leaves, &self.noise, shape.leaf_radius).grow(
            Vec3::ZERO,
            shape.trunk_target(),
            shape.thickness / 2,
            shape.length,
            ROOT_DEPTH,
        );

        log::debug!(
            "Tree {:?}: {} branches, {} wood cells, {} leaf cells",
            shape, report.branches, wood.solid_count(), leaves.solid_count()
        );

        TreeVolume { shape, wood, leaves, report }
    }

    /// Fill a cube with fractal-noise rock, an alternative test volume for
    /// the same meshing path as trees.
    pub fn fill_fractal(&self, size: u32) -> VoxelGrid3D<TreeVoxel> {
        VoxelGrid3D::from_fn(size, size, size, |x, y, z| {
            if self.noise.fractal3d(x as f32, y as f32, z as f32) < FRACTAL_FILL_THRESHOLD {
                TreeVoxel::Wood
            } else {
                TreeVoxel::Empty
            }
        })
    }
}

impl Default for TreeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(size: u32) -> (VoxelGrid3D<TreeVoxel>, VoxelGrid3D<TreeVoxel>) {
        (VoxelGrid3D::new(size, size, size), VoxelGrid3D::new(size, size, size))
    }

    #[test]
    fn test_depth_cap_writes_nothing() {
        let (mut wood, mut leaves) = grids(40);
        let noise = NoiseSampler::unshifted();
        let report = BranchGrower::new(&mut wood, &mut leaves, &noise, 3)
            .grow(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 2, 10, MAX_BRANCH_DEPTH + 1);

        assert_eq!(report, GrowthReport::default());
        assert!(wood.is_empty());
        assert!(leaves.is_empty());
    }

    #[test]
    fn test_zero_length_writes_nothing() {
        let (mut wood, mut leaves) = grids(40);
        let noise = NoiseSampler::unshifted();
        let report = BranchGrower::new(&mut wood, &mut leaves, &noise, 3)
            .grow(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 2, 0, ROOT_DEPTH);

        assert_eq!(report.wood_writes + report.leaf_writes, 0);
        assert!(wood.is_empty());
    }

    #[test]
    fn test_leafless_below_max_depth() {
        // A single depth-5 branch with length 1 has children of length 0.
        let (mut wood, mut leaves) = grids(40);
        let noise = NoiseSampler::unshifted();
        let report = BranchGrower::new(&mut wood, &mut leaves, &noise, 3)
            .grow(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), 1, 1, 5);

        assert_eq!(report.branches, 1);
        assert!(!wood.is_empty());
        assert!(leaves.is_empty());
    }

    #[test]
    fn test_max_depth_grows_leaves_around_wood() {
        let (mut wood, mut leaves) = grids(40);
        let noise = NoiseSampler::unshifted();
        let report = BranchGrower::new(&mut wood, &mut leaves, &noise, 2)
            .grow(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 14.0, 0.0), 0, 4, MAX_BRANCH_DEPTH);

        assert_eq!(report.branches, 1);
        assert!(report.leaf_writes > 0);
        // The straight-up walk visits y = 10..=13 on the center column.
        for y in 10..14 {
            assert_eq!(wood.get(20, y, 20), TreeVoxel::Wood);
            assert_eq!(leaves.get(20, y, 20), TreeVoxel::Empty, "leaves must not cover wood");
        }
        assert_eq!(leaves.get(21, 11, 20), TreeVoxel::Leaf);
    }

    #[test]
    fn test_later_wood_clears_leaf() {
        let (mut wood, mut leaves) = grids(40);
        leaves.set(20, 11, 20, TreeVoxel::Leaf);
        leaves.set(25, 11, 20, TreeVoxel::Leaf);
        let noise = NoiseSampler::unshifted();
        // Depth 5 grows no leaves of its own.
        BranchGrower::new(&mut wood, &mut leaves, &noise, 2)
            .grow(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 14.0, 0.0), 0, 4, 5);

        assert_eq!(wood.get(20, 11, 20), TreeVoxel::Wood);
        assert_eq!(leaves.get(20, 11, 20), TreeVoxel::Empty);
        assert_eq!(leaves.get(25, 11, 20), TreeVoxel::Leaf, "leaves off the branch stay");
    }

    #[test]
    fn test_trunk_disc_is_round() {
        let (mut wood, mut leaves) = grids(40);
        let noise = NoiseSampler::unshifted();
        // Radius-3 discs at world z = 0..=3; the z = 0 disc lands on grid slice 20.
        BranchGrower::new(&mut wood, &mut leaves, &noise, 2)
            .grow(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), 3, 1, 5);

        // Facing +Z the disc lies in the XY plane; y < 0 is dropped.
        assert_eq!(wood.get(23, 0, 20), TreeVoxel::Wood);
        assert_eq!(wood.get(20, 3, 20), TreeVoxel::Wood);
        assert_eq!(wood.get(23, 3, 20), TreeVoxel::Empty, "corner lies outside the circle");
        assert_eq!(wood.get(22, 2, 20), TreeVoxel::Wood);
    }

    #[test]
    fn test_walk_stops_at_grid_exit() {
        let (mut wood, mut leaves) = grids(10);
        let noise = NoiseSampler::unshifted();
        let report = BranchGrower::new(&mut wood, &mut leaves, &noise, 2)
            .grow(Vec3::ZERO, Vec3::new(0.0, 1000.0, 0.0), 0, 1, MAX_BRANCH_DEPTH);
        assert_eq!(report.steps, 10);
    }

    #[test]
    fn test_child_branch_bands() {
        // The first two levels always spawn all four children.
        assert_eq!(child_branches(1, 7), [true; 4]);
        assert_eq!(child_branches(2, 4), [true; 4]);
        // Depth 3 still forces the two left-hand children.
        assert_eq!(child_branches(3, 9), [false, true, false, true]);
        // Deeper levels follow the count bands alone.
        assert_eq!(child_branches(4, 0), [true, false, false, false]);
        assert_eq!(child_branches(4, 1), [true, true, false, false]);
        assert_eq!(child_branches(4, 2), [true, false, true, false]);
        assert_eq!(child_branches(4, 3), [true, false, false, true]);
        assert_eq!(child_branches(4, 5), [false, true, true, false]);
        assert_eq!(child_branches(4, 6), [false, true, false, true]);
        assert_eq!(child_branches(4, 7), [false, false, true, false]);
        assert_eq!(child_branches(4, 8), [false, false, true, true]);
        assert_eq!(child_branches(4, 9), [false, false, false, true]);
        assert_eq!(child_branches(5, 10), [true; 4]);
        assert_eq!(child_branches(6, 12), [true; 4]);
    }

    #[test]
    fn test_look_at_basis_is_orthonormal() {
        let mut cursor = BranchCursor::at(Vec3::new(1.0, 2.0, 3.0));
        cursor.look_at(Vec3::new(4.0, 7.0, -1.0));
        assert!((cursor.forward.length() - 1.0).abs() < 1e-5);
        assert!((cursor.right.length() - 1.0).abs() < 1e-5);
        assert!((cursor.up.length() - 1.0).abs() < 1e-5);
        assert!(cursor.forward.dot(cursor.right).abs() < 1e-5);
        assert!(cursor.forward.dot(cursor.up).abs() < 1e-5);
        assert!(cursor.up.y > 0.0);
    }

    #[test]
    fn test_look_at_straight_up() {
        let mut cursor = BranchCursor::at(Vec3::ZERO);
        cursor.look_at(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(cursor.forward, Vec3::Y);
        assert_eq!(cursor.right, Vec3::X);
        assert!(cursor.forward.dot(cursor.up).abs() < 1e-6);
    }

    #[test]
    fn test_shape_bounds() {
        let noise = NoiseSampler::unshifted();
        for i in 0..30 {
            let shape = TreeShape::from_position(&noise, i as f32 * 7.3, i as f32 * 3.1);
            assert!((1..=11).contains(&shape.thickness));
            assert!((1..=16).contains(&shape.length));
            assert_eq!(shape.size_xz, 10 * shape.length as u32);
            assert!((2..=5).contains(&shape.leaf_radius));
            assert!((-3..=3).contains(&shape.lean_x));
            assert!((-3..=3).contains(&shape.lean_z));
        }
    }

    #[test]
    fn test_generate_tree() {
        let generator = TreeGenerator::default();
        let tree = generator.generate(12.0, 34.0);
        let dims = tree.wood.dims();
        assert_eq!(dims.x, tree.shape.size_xz);
        assert_eq!(dims.y, tree.shape.size_y);
        assert_eq!(tree.leaves.dims(), dims);
        assert!(tree.report.branches >= 1);
        assert!(!tree.wood.is_empty(), "trunk must leave wood");

        // Wood and leaves never share a cell.
        for (w, l) in tree.wood.as_slice().iter().zip(tree.leaves.as_slice()) {
            assert!(!(*w == TreeVoxel::Wood && *l == TreeVoxel::Leaf));
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let generator = TreeGenerator::default();
        let a = generator.generate(5.0, 9.0);
        let b = generator.generate(5.0, 9.0);
        assert_eq!(a.wood, b.wood);
        assert_eq!(a.leaves, b.leaves);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_fill_fractal() {
        let grid = TreeGenerator::default().fill_fractal(16);
        assert_eq!(grid.dims().x, 16);
        assert!(grid.as_slice().iter().all(|v| *v != TreeVoxel::Leaf));
    }
}
