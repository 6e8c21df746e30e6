//! Cubic block partitioning of a volume
//!
//! The output volume is cut into axis-aligned blocks and each block is
//! dispatched to a worker as a unit. Blocks write disjoint output
//! regions, so workers need no synchronization beyond the final join.

/// Block edge length for volumes with z extent
pub const BLOCK_3D: usize = 64;
/// Block edge length for single-slice (2D) volumes
pub const BLOCK_2D: usize = 512;

/// An axis-aligned sub-volume processed by one worker.
///
/// Each range is half-open: the block covers `xs..xe` along x, and so
/// on. Ranges may be empty for blocks swallowed by an inset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub xs: usize,
    pub xe: usize,
    pub ys: usize,
    pub ye: usize,
    pub zs: usize,
    pub ze: usize,
}

impl Block {
    /// Whether the block covers no voxels
    pub fn is_empty(&self) -> bool {
        self.xs >= self.xe || self.ys >= self.ye || self.zs >= self.ze
    }

    /// Number of voxels covered
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.xe - self.xs) * (self.ye - self.ys) * (self.ze - self.zs)
        }
    }
}

/// Iterator over the blocks covering a volume.
///
/// The volume is partitioned into cubes of side [`BLOCK_3D`] (squares of
/// side [`BLOCK_2D`] when `sz == 1`). With a nonzero `inset`, each block
/// range is clipped to `[max(inset, b*B), min((b+1)*B, s - inset))` along
/// x and y, and along z only when the volume has z extent; erosion uses
/// this to leave boundary voxels untouched.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    sx: usize,
    sy: usize,
    sz: usize,
    block: usize,
    inset: usize,
    gx: usize,
    gy: usize,
    gz: usize,
    index: usize,
}

impl BlockGrid {
    /// Create a block partition of a volume
    pub fn new(sx: usize, sy: usize, sz: usize, inset: usize) -> Self {
        let block = if sz > 1 { BLOCK_3D } else { BLOCK_2D };
        Self {
            sx,
            sy,
            sz,
            block,
            inset,
            gx: sx.div_ceil(block).max(1),
            gy: sy.div_ceil(block).max(1),
            gz: sz.div_ceil(block).max(1),
            index: 0,
        }
    }

    /// Total number of blocks in the partition
    pub fn block_count(&self) -> usize {
        self.gx * self.gy * self.gz
    }

    /// Block edge length in use
    pub fn block_size(&self) -> usize {
        self.block
    }

    fn axis_range(&self, b: usize, extent: usize, inset: usize) -> (usize, usize) {
        let start = (b * self.block).max(inset);
        let end = ((b + 1) * self.block).min(extent.saturating_sub(inset));
        (start, end)
    }

    fn block_at(&self, index: usize) -> Block {
        let bx = index % self.gx;
        let by = (index / self.gx) % self.gy;
        let bz = index / (self.gx * self.gy);

        // A single-slice volume keeps its one z layer even when inset.
        let z_inset = if self.sz > 1 { self.inset } else { 0 };

        let (xs, xe) = self.axis_range(bx, self.sx, self.inset);
        let (ys, ye) = self.axis_range(by, self.sy, self.inset);
        let (zs, ze) = self.axis_range(bz, self.sz, z_inset);

        Block {
            xs,
            xe,
            ys,
            ye,
            zs,
            ze,
        }
    }
}

impl Iterator for BlockGrid {
    type Item = Block;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.block_count() {
            return None;
        }
        let block = self.block_at(self.index);
        self.index += 1;
        Some(block)
    }
}
