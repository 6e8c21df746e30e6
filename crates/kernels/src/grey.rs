//! Grayscale dilation and erosion (max/min filters)
//!
//! Each output voxel is the maximum (dilation) or minimum (erosion) of
//! its 3x3x3 (2D: 3x3) neighborhood. Every in-range voxel is written.
//! Out-of-range neighbors contribute the reduction identity, so the
//! boundary behaves as if clamped.
//!
//! Both kernels run the same rolling-window sweep, parameterized by the
//! column reduction. The window holds one reduced value per column.
//! The type extremum acts as an absorbing element: a column that reduces
//! to it saturates every window containing that column, so the engine
//! writes the extremum to all affected voxels and skips ahead, mirroring
//! the erosion engine's impure-column short-circuits.

use std::marker::PhantomData;

use voxmorph_core::{Algorithm, Error, Result, VoxelElement, VoxelGrid};
use voxmorph_parallel::{Block, BlockGrid, ParallelStrategy, ProcessingMode};

use crate::stencil::{column_max, column_min, SharedOutput, VolumeShape};

/// Parameters for the grayscale kernels
#[derive(Debug, Clone, Default)]
pub struct GreyParams {
    /// Worker threads; zero runs synchronously on the calling thread
    pub threads: usize,
}

/// Grayscale dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct GreyDilate<T: VoxelElement> {
    _element: PhantomData<T>,
}

impl<T: VoxelElement> Algorithm for GreyDilate<T> {
    type Input = VoxelGrid<T>;
    type Output = VoxelGrid<T>;
    type Params = GreyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GreyDilate"
    }

    fn description(&self) -> &'static str {
        "Grayscale dilation (max of the 3x3x3 neighborhood)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (sx, sy, sz) = input.shape();
        let mut output = VoxelGrid::new(sx, sy, sz);
        grey_dilate(
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

/// Grayscale erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct GreyErode<T: VoxelElement> {
    _element: PhantomData<T>,
}

impl<T: VoxelElement> Algorithm for GreyErode<T> {
    type Input = VoxelGrid<T>;
    type Output = VoxelGrid<T>;
    type Params = GreyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GreyErode"
    }

    fn description(&self) -> &'static str {
        "Grayscale erosion (min of the 3x3x3 neighborhood)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (sx, sy, sz) = input.shape();
        let mut output = VoxelGrid::new(sx, sy, sz);
        grey_erode(
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

/// Dilate a grayscale volume: every output voxel becomes the maximum of
/// its neighborhood. Buffers are x-fastest with the element at
/// (x, y, z) at index `x + sx * (y + sy * z)`.
pub fn grey_dilate<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    sz: usize,
    threads: usize,
) -> Result<()> {
    let shape = VolumeShape::checked(labels, output, sx, sy, sz)?;
    let blocks: Vec<Block> = BlockGrid::new(sx, sy, sz, 0).collect();
    let shared = SharedOutput::new(output);
    let mode = ProcessingMode::from_threads(threads.min(blocks.len()));
    mode.par_for_each(0..blocks.len(), |i| {
        grey_block(MaxColumn, labels, &shared, shape, blocks[i])
    })
}

/// Erode a grayscale volume: every output voxel becomes the minimum of
/// its neighborhood. Buffer layout as in [`grey_dilate`].
pub fn grey_erode<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    sz: usize,
    threads: usize,
) -> Result<()> {
    let shape = VolumeShape::checked(labels, output, sx, sy, sz)?;
    let blocks: Vec<Block> = BlockGrid::new(sx, sy, sz, 0).collect();
    let shared = SharedOutput::new(output);
    let mode = ProcessingMode::from_threads(threads.min(blocks.len()));
    mode.par_for_each(0..blocks.len(), |i| {
        grey_block(MinColumn, labels, &shared, shape, blocks[i])
    })
}

/// 2D variant of [`grey_dilate`] over a single-slice volume.
pub fn grey_dilate_2d<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    threads: usize,
) -> Result<()> {
    grey_dilate(labels, output, sx, sy, 1, threads)
}

/// 2D variant of [`grey_erode`] over a single-slice volume.
pub fn grey_erode_2d<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    threads: usize,
) -> Result<()> {
    grey_erode(labels, output, sx, sy, 1, threads)
}

/// Column reduction for one grayscale kernel direction.
trait GreyColumn<T: VoxelElement>: Copy {
    /// Absorbing element: a column reducing to it saturates every
    /// window that contains the column.
    fn absorbing(&self) -> T;

    /// Reduce the in-range face of column `xi`; the reduction identity
    /// for an out-of-range column.
    fn column(&self, labels: &[T], shape: VolumeShape, xi: isize, y: usize, z: usize) -> T;

    fn combine(&self, a: T, b: T) -> T;
}

#[derive(Clone, Copy)]
struct MaxColumn;

impl<T: VoxelElement> GreyColumn<T> for MaxColumn {
    fn absorbing(&self) -> T {
        T::max_value()
    }

    fn column(&self, labels: &[T], shape: VolumeShape, xi: isize, y: usize, z: usize) -> T {
        column_max(labels, shape, xi, y, z)
    }

    fn combine(&self, a: T, b: T) -> T {
        a.max(b)
    }
}

#[derive(Clone, Copy)]
struct MinColumn;

impl<T: VoxelElement> GreyColumn<T> for MinColumn {
    fn absorbing(&self) -> T {
        T::min_value()
    }

    fn column(&self, labels: &[T], shape: VolumeShape, xi: isize, y: usize, z: usize) -> T {
        column_min(labels, shape, xi, y, z)
    }

    fn combine(&self, a: T, b: T) -> T {
        a.min(b)
    }
}

/// Write `value` to the next `max_run` voxels of the row, clipped to the
/// block's x extent, and return how many were written.
#[inline]
fn write_run<T: VoxelElement>(
    output: &SharedOutput<T>,
    loc: usize,
    value: T,
    max_run: usize,
    remaining: usize,
) -> usize {
    let n = max_run.min(remaining);
    for i in 0..n {
        unsafe { output.write(loc + i, value) };
    }
    n
}

fn grey_block<T: VoxelElement, K: GreyColumn<T>>(
    kernel: K,
    labels: &[T],
    output: &SharedOutput<T>,
    shape: VolumeShape,
    block: Block,
) {
    let absorbing = kernel.absorbing();

    let mut col_left = absorbing;
    let mut col_middle = absorbing;
    let mut col_right = absorbing;

    for z in block.zs..block.ze {
        for y in block.ys..block.ye {
            let mut stale = 3usize;
            let mut x = block.xs;
            while x < block.xe {
                let loc = shape.loc(x, y, z);
                let center = labels[loc];

                // An absorbing center saturates its own window and the
                // next one; settle both voxels without a refill.
                if center == absorbing {
                    let n = write_run(output, loc, absorbing, 2, block.xe - x);
                    x += n;
                    stale += 2;
                    continue;
                }

                let xi = x as isize;
                match stale {
                    0 => {}
                    1 => {
                        col_left = col_middle;
                        col_middle = col_right;
                        col_right = kernel.column(labels, shape, xi + 1, y, z);
                    }
                    2 => {
                        col_left = col_right;
                        col_right = kernel.column(labels, shape, xi + 1, y, z);
                        if col_right == absorbing {
                            let n = write_run(output, loc, absorbing, 3, block.xe - x);
                            x += n;
                            stale = 3;
                            continue;
                        }
                        col_middle = kernel.column(labels, shape, xi, y, z);
                    }
                    _ => {
                        col_right = kernel.column(labels, shape, xi + 1, y, z);
                        if col_right == absorbing {
                            let n = write_run(output, loc, absorbing, 3, block.xe - x);
                            x += n;
                            stale = 3;
                            continue;
                        }
                        col_middle = kernel.column(labels, shape, xi, y, z);
                        if col_middle == absorbing {
                            let n = write_run(output, loc, absorbing, 2, block.xe - x);
                            x += n;
                            stale = 2;
                            continue;
                        }
                        col_left = kernel.column(labels, shape, xi - 1, y, z);
                    }
                }

                // An absorbing right column saturates the windows at x,
                // x+1 and x+2; an absorbing middle column those at x
                // and x+1.
                if col_right == absorbing {
                    let n = write_run(output, loc, absorbing, 3, block.xe - x);
                    x += n;
                    stale = 3;
                    continue;
                } else if col_middle == absorbing {
                    let n = write_run(output, loc, absorbing, 2, block.xe - x);
                    x += n;
                    stale = 2;
                    continue;
                }

                let reduced = kernel.combine(kernel.combine(col_left, col_middle), col_right);
                unsafe { output.write(loc, reduced) };

                stale = 1;
                x += 1;
            }
        }
    }
}
