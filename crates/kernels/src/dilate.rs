//! Multilabel dilation (neighborhood mode)
//!
//! Replaces each voxel by the most frequent non-zero label in its
//! 3x3x3 (2D: 3x3) neighborhood. With `background_only` set, voxels
//! that already carry a label are preserved and only background is
//! filled in.
//!
//! The sweep keeps a rolling three-column stencil window and a stale
//! counter tracking how many columns must be refilled. Two fast paths
//! let the engine decide the next voxel without recomputation: a pair of
//! uniform faces totalling at least 14 labels, or a winning run of at
//! least 23 in the full window, each outweigh anything the incoming
//! column could contribute one step ahead. The thresholds are
//! sufficiency bounds, not tuning knobs.

use std::marker::PhantomData;

use num_traits::Zero;
use voxmorph_core::{Algorithm, Error, Result, VoxelElement, VoxelGrid};
use voxmorph_parallel::{Block, BlockGrid, ParallelStrategy, ProcessingMode};

use crate::sort::small_sort;
use crate::stencil::{gather, gather_front, SharedOutput, VolumeShape};

/// Parameters for multilabel dilation
#[derive(Debug, Clone)]
pub struct DilateParams {
    /// Only fill background voxels, preserving existing labels
    pub background_only: bool,
    /// Worker threads; zero runs synchronously on the calling thread
    pub threads: usize,
}

impl Default for DilateParams {
    fn default() -> Self {
        Self {
            background_only: true,
            threads: 0,
        }
    }
}

/// Multilabel dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct MultilabelDilate<T: VoxelElement> {
    _element: PhantomData<T>,
}

impl<T: VoxelElement> Algorithm for MultilabelDilate<T> {
    type Input = VoxelGrid<T>;
    type Output = VoxelGrid<T>;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MultilabelDilate"
    }

    fn description(&self) -> &'static str {
        "Multilabel dilation (mode of the 3x3x3 neighborhood)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (sx, sy, sz) = input.shape();
        let mut output = VoxelGrid::new(sx, sy, sz);
        multilabel_dilate(
            input.as_slice(),
            output.as_slice_mut(),
            sx,
            sy,
            sz,
            params.background_only,
            params.threads,
        )?;
        Ok(output)
    }
}

/// Dilate a multilabel volume into a zeroed output buffer.
///
/// Each output voxel receives the mode of the non-zero labels in its
/// neighborhood (ties go to the smallest label), or stays zero when the
/// neighborhood is all background. With `background_only`, non-zero
/// input voxels are copied through unchanged. Buffers are x-fastest
/// with the element at (x, y, z) at index `x + sx * (y + sy * z)`;
/// `output` must be zero-initialized by the caller.
pub fn multilabel_dilate<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    sz: usize,
    background_only: bool,
    threads: usize,
) -> Result<()> {
    let shape = VolumeShape::checked(labels, output, sx, sy, sz)?;
    let blocks: Vec<Block> = BlockGrid::new(sx, sy, sz, 0).collect();
    let shared = SharedOutput::new(output);
    let mode = ProcessingMode::from_threads(threads.min(blocks.len()));
    mode.par_for_each(0..blocks.len(), |i| {
        dilate_block(labels, &shared, shape, blocks[i], background_only)
    })
}

/// 2D variant of [`multilabel_dilate`] over a single-slice volume.
pub fn multilabel_dilate_2d<T: VoxelElement>(
    labels: &[T],
    output: &mut [T],
    sx: usize,
    sy: usize,
    background_only: bool,
    threads: usize,
) -> Result<()> {
    multilabel_dilate(labels, output, sx, sy, 1, background_only, threads)
}

fn dilate_block<T: VoxelElement>(
    labels: &[T],
    output: &SharedOutput<T>,
    shape: VolumeShape,
    block: Block,
    background_only: bool,
) {
    let sxy = shape.sxy;

    // Rolling window columns and the concatenation scratch, reused
    // across the whole block.
    let mut left: Vec<T> = Vec::with_capacity(9);
    let mut middle: Vec<T> = Vec::with_capacity(9);
    let mut right: Vec<T> = Vec::with_capacity(9);
    let mut neighbors: Vec<T> = Vec::with_capacity(27);

    for z in block.zs..block.ze {
        for y in block.ys..block.ye {
            let mut stale = 3usize;
            let mut x = block.xs;
            while x < block.xe {
                let loc = shape.loc(x, y, z);

                if background_only && !labels[loc].is_zero() {
                    unsafe { output.write(loc, labels[loc]) };
                    stale += 1;
                    x += 1;
                    continue;
                }

                let xi = x as isize;
                // If the layer below produced nothing here, everything it
                // could see already lost; only the +z row can change the
                // verdict at this voxel.
                let front_only =
                    z > block.zs && unsafe { output.read(loc - sxy) }.is_zero();
                if front_only {
                    match stale {
                        0 => {}
                        1 => {
                            std::mem::swap(&mut left, &mut middle);
                            std::mem::swap(&mut middle, &mut right);
                            gather_front(labels, shape, xi + 1, y, z, &mut right);
                        }
                        2 => {
                            std::mem::swap(&mut left, &mut right);
                            gather_front(labels, shape, xi, y, z, &mut middle);
                            gather_front(labels, shape, xi + 1, y, z, &mut right);
                        }
                        _ => {
                            gather_front(labels, shape, xi - 1, y, z, &mut left);
                            gather_front(labels, shape, xi, y, z, &mut middle);
                            gather_front(labels, shape, xi + 1, y, z, &mut right);
                        }
                    }
                } else {
                    match stale {
                        0 => {}
                        1 => {
                            std::mem::swap(&mut left, &mut middle);
                            std::mem::swap(&mut middle, &mut right);
                            gather(labels, shape, xi + 1, y, z, &mut right);
                        }
                        2 => {
                            std::mem::swap(&mut left, &mut right);
                            gather(labels, shape, xi, y, z, &mut middle);
                            gather(labels, shape, xi + 1, y, z, &mut right);
                        }
                        _ => {
                            gather(labels, shape, xi - 1, y, z, &mut left);
                            gather(labels, shape, xi, y, z, &mut middle);
                            gather(labels, shape, xi + 1, y, z, &mut right);
                        }
                    }
                }

                if left.is_empty() && middle.is_empty() && right.is_empty() {
                    stale = 1;
                    x += 1;
                    continue;
                }

                small_sort(&mut middle);
                small_sort(&mut right);

                // Both faces uniform on one label with enough mass to also
                // dominate the window one step ahead: decide two voxels.
                if middle.len() + right.len() >= 14
                    && right[0] == right[right.len() - 1]
                    && middle[0] == middle[middle.len() - 1]
                    && right[0] == middle[0]
                {
                    unsafe { output.write(loc, right[0]) };
                    if x + 1 < block.xe {
                        unsafe { output.write(loc + 1, right[0]) };
                        stale = 2;
                        x += 2;
                    } else {
                        stale = 1;
                        x += 1;
                    }
                    continue;
                }

                neighbors.clear();
                neighbors.extend_from_slice(&left);
                neighbors.extend_from_slice(&middle);
                neighbors.extend_from_slice(&right);
                small_sort(&mut neighbors);

                let size = neighbors.len();

                if neighbors[0] == neighbors[size - 1] {
                    unsafe { output.write(loc, neighbors[0]) };
                    if size >= 23 && x + 1 < block.xe {
                        unsafe { output.write(loc + 1, neighbors[0]) };
                        stale = 2;
                        x += 2;
                    } else {
                        stale = 1;
                        x += 1;
                    }
                    continue;
                }

                // Mode of the sorted runs; ties go to the first run, i.e.
                // the smallest label.
                let mut mode_label = neighbors[0];
                let mut run = 1usize;
                let mut best = 1usize;
                for i in 1..size {
                    if neighbors[i] != neighbors[i - 1] {
                        if run > best {
                            mode_label = neighbors[i - 1];
                            best = run;
                        }
                        run = 1;
                        // No remaining run can beat the current best.
                        if size - i < best {
                            break;
                        }
                    } else {
                        run += 1;
                    }
                }
                if run > best {
                    mode_label = neighbors[size - 1];
                    best = run;
                }

                unsafe { output.write(loc, mode_label) };

                // A run this long also wins the window at x+1.
                if best >= 23 && x + 1 < block.xe {
                    unsafe { output.write(loc + 1, mode_label) };
                    stale = 2;
                    x += 2;
                    continue;
                }

                stale = 1;
                x += 1;
            }
        }
    }
}
