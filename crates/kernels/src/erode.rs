//! Multilabel erosion (neighborhood agreement)
//!
//! A voxel survives erosion iff its entire 3x3x3 (2D: 3x3) neighborhood
//! is in range and carries its own label; everything else becomes
//! background. Volume-boundary voxels can never survive, so the block
//! scheduler insets the swept region by one along each populated axis.
//!
//! The sweep tracks the purity of the three window columns as plain
//! scalars. An impure column kills every window containing it, which
//! lets the engine skip ahead aggressively: an impure right column rules
//! out the next two voxels at once, an impure middle column the next
//! one. When the voxel below (or behind, along y) already survived with
//! the same label, the purity probes shrink to the single face the
//! previous decision did not certify.

use std::marker::PhantomData;

use num_traits::Zero;
use voxmorph_core::{Algorithm, Error, Result, VoxelElement, VoxelGrid};
use voxmorph_parallel::{Block, BlockGrid, ParallelStrategy, ProcessingMode};

use crate::stencil::{
    column_pure, column_pure_front_y, column_pure_front_z, SharedOutput, VolumeShape,
};

/// Parameters for multilabel erosion
#[derive(Debug, Clone, Default)]
pub struct ErodeParams {
    /// Worker threads; zero runs synchronously on the calling thread
    pub threads: usize,
}

/// Multilabel erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct MultilabelErode<T: VoxelElement> {
    _element: PhantomData<T>,
}

impl<T: VoxelElement> Algorithm for MultilabelErode<T> {
    type Input = VoxelGrid<T>;
    type Output = VoxelGrid<T>;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MultilabelErode"
    }

    fn description(&self) -> &'static str {
        "Multilabel erosion (a voxel survives iff its whole neighborhood agrees)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (sx, sy, sz) = input.shape();
        let mut output = VoxelGrid::new(sx, sy, sz);
        multilabel_erode(
            input.as_slice(),
            output.as_slice_mut(),
            sx,
            sy,
            sz,
            params.threads,
        )?;
        Ok(output)
    }
}

/// Erode a multilabel volume into a zeroed output buffer.
///
/// A voxel keeps its label iff every neighbor in its 3x3x3 (2D: 3x3)
/// neighborhood exists and carries the same label; all other voxels
/// stay zero. Buffers are x-fastest with the element at (x, y, z) at
/// index `x + sx * (y + sy * z)`; `output` must be zero-initialized by
/// the caller.
pub fn multilabel_erode<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    sz: usize,
    threads: usize,
) -> Result<()> {
    let shape = VolumeShape::checked(labels, output, sx, sy, sz)?;
    let blocks: Vec<Block> = BlockGrid::new(sx, sy, sz, 1).collect();
    let shared = SharedOutput::new(output);
    let mode = ProcessingMode::from_threads(threads.min(blocks.len()));
    mode.par_for_each(0..blocks.len(), |i| {
        erode_block(labels, &shared, shape, blocks[i])
    })
}

/// 2D variant of [`multilabel_erode`] over a single-slice volume.
pub fn multilabel_erode_2d<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    threads: usize,
) -> Result<()> {
    multilabel_erode(labels, output, sx, sy, 1, threads)
}

fn erode_block<T: VoxelElement>(
    labels: &[T],
    output: &SharedOutput<T>,
    shape: VolumeShape,
    block: Block,
) {
    let sx = shape.sx;
    let sxy = shape.sxy;

    let mut pure_left = T::zero();
    let mut pure_middle = T::zero();
    let mut pure_right = T::zero();

    for z in block.zs..block.ze {
        for y in block.ys..block.ye {
            let mut stale = 3usize;
            let mut x = block.xs;
            while x < block.xe {
                let loc = shape.loc(x, y, z);
                let center = labels[loc];

                // A background center makes the middle column of the next
                // window impure too, so both voxels are settled.
                if center.is_zero() {
                    x += 2;
                    stale += 2;
                    continue;
                }

                // When an overlapping neighbor already survived with this
                // label, only the face it did not certify needs probing.
                let fast_z = z > block.zs && unsafe { output.read(loc - sxy) } == center;
                let fast_y =
                    !fast_z && y > block.ys && unsafe { output.read(loc - sx) } == center;
                let probe = |xi: isize| -> T {
                    if fast_z {
                        column_pure_front_z(labels, shape, xi, y, z)
                    } else if fast_y {
                        column_pure_front_y(labels, shape, xi, y, z)
                    } else {
                        column_pure(labels, shape, xi, y, z)
                    }
                };

                let xi = x as isize;
                match stale {
                    0 => {}
                    1 => {
                        pure_left = pure_middle;
                        pure_middle = pure_right;
                        pure_right = probe(xi + 1);
                    }
                    2 => {
                        pure_left = pure_right;
                        pure_right = probe(xi + 1);
                        if pure_right.is_zero() {
                            x += 3;
                            stale = 3;
                            continue;
                        }
                        pure_middle = probe(xi);
                    }
                    _ => {
                        pure_right = probe(xi + 1);
                        if pure_right.is_zero() {
                            x += 3;
                            stale = 3;
                            continue;
                        }
                        pure_middle = probe(xi);
                        if pure_middle.is_zero() {
                            x += 2;
                            stale = 2;
                            continue;
                        }
                        pure_left = probe(xi - 1);
                    }
                }

                // An impure right column also dooms the windows at x+1
                // and x+2; an impure middle column dooms x+1.
                if pure_right.is_zero() {
                    x += 3;
                    stale = 3;
                    continue;
                } else if pure_middle.is_zero() {
                    x += 2;
                    stale = 2;
                    continue;
                } else if pure_left == pure_middle && pure_middle == pure_right {
                    unsafe { output.write(loc, center) };
                }

                stale = 1;
                x += 1;
            }
        }
    }
}
