//! Stencil-window primitives shared by the morphology engines
//!
//! A kernel sweep keeps a rolling window of three stencil columns at
//! x-1, x and x+1. The helpers here extract one column's 3x3 face
//! (1x3 for single-slice volumes, which degenerate naturally through the
//! boundary clamp): the multilabel gathers collect non-zero labels, the
//! purity tests check face agreement for erosion, and the grayscale
//! reductions fold a face to its max or min.

use num_traits::Zero;
use voxmorph_core::{Error, Result, VoxelElement};

/// Dimensions of a volume plus the derived x-y plane stride.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VolumeShape {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub sxy: usize,
}

impl VolumeShape {
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            sxy: sx * sy,
        }
    }

    /// Validate dimensions and buffer lengths at the public boundary.
    pub fn checked<T>(labels: &[T], output: &[T], sx: usize, sy: usize, sz: usize) -> Result<Self> {
        if sx == 0 || sy == 0 || sz == 0 {
            return Err(Error::InvalidDimensions { sx, sy, sz });
        }
        let expected = sx
            .checked_mul(sy)
            .and_then(|v| v.checked_mul(sz))
            .ok_or(Error::InvalidDimensions { sx, sy, sz })?;
        if labels.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: labels.len(),
            });
        }
        if output.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: output.len(),
            });
        }
        Ok(Self::new(sx, sy, sz))
    }

    /// Linear index of (x, y, z)
    #[inline]
    pub fn loc(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.sx * (y + self.sy * z)
    }

    #[inline]
    fn column_base(&self, xi: isize, y: usize, z: usize) -> Option<usize> {
        if xi < 0 || xi >= self.sx as isize {
            return None;
        }
        Some(self.loc(xi as usize, y, z))
    }
}

/// Collect the non-zero labels on the 3x3 face of column `xi` centered
/// at (y, z) into `out`. Out-of-range positions are skipped; the output
/// order is unspecified and consumers sort before use. Empty when `xi`
/// is out of range.
pub(crate) fn gather<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
    out: &mut Vec<T>,
) {
    out.clear();
    let Some(loc) = shape.column_base(xi, y, z) else {
        return;
    };
    let sx = shape.sx;
    let sxy = shape.sxy;
    let y_lo = y > 0;
    let y_hi = y + 1 < shape.sy;
    let z_lo = z > 0;
    let z_hi = z + 1 < shape.sz;

    if !labels[loc].is_zero() {
        out.push(labels[loc]);
    }
    if y_lo && !labels[loc - sx].is_zero() {
        out.push(labels[loc - sx]);
    }
    if y_hi && !labels[loc + sx].is_zero() {
        out.push(labels[loc + sx]);
    }
    if z_lo && !labels[loc - sxy].is_zero() {
        out.push(labels[loc - sxy]);
    }
    if z_hi && !labels[loc + sxy].is_zero() {
        out.push(labels[loc + sxy]);
    }
    if y_lo && z_lo && !labels[loc - sx - sxy].is_zero() {
        out.push(labels[loc - sx - sxy]);
    }
    if y_hi && z_lo && !labels[loc + sx - sxy].is_zero() {
        out.push(labels[loc + sx - sxy]);
    }
    if y_lo && z_hi && !labels[loc - sx + sxy].is_zero() {
        out.push(labels[loc - sx + sxy]);
    }
    if y_hi && z_hi && !labels[loc + sx + sxy].is_zero() {
        out.push(labels[loc + sx + sxy]);
    }
}

/// As [`gather`], but only the +z row of the face. Used by the dilation
/// fast path once the z-1 layer is known to have contributed nothing.
pub(crate) fn gather_front<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
    out: &mut Vec<T>,
) {
    out.clear();
    let Some(loc) = shape.column_base(xi, y, z) else {
        return;
    };
    if z + 1 >= shape.sz {
        return;
    }
    let sx = shape.sx;
    let front = loc + shape.sxy;

    if !labels[front].is_zero() {
        out.push(labels[front]);
    }
    if y > 0 && !labels[front - sx].is_zero() {
        out.push(labels[front - sx]);
    }
    if y + 1 < shape.sy && !labels[front + sx].is_zero() {
        out.push(labels[front + sx]);
    }
}

/// Purity test for the face of column `xi` centered at (y, z): returns
/// the center label iff the center is non-zero and every in-range
/// neighbor on the face equals it, else zero.
pub(crate) fn column_pure<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
) -> T {
    let Some(loc) = shape.column_base(xi, y, z) else {
        return T::zero();
    };
    let center = labels[loc];
    if center.is_zero() {
        return T::zero();
    }
    let sx = shape.sx;
    let sxy = shape.sxy;
    let y_lo = y > 0;
    let y_hi = y + 1 < shape.sy;
    let z_lo = z > 0;
    let z_hi = z + 1 < shape.sz;

    let pure = (!y_lo || labels[loc - sx] == center)
        && (!y_hi || labels[loc + sx] == center)
        && (!z_lo || labels[loc - sxy] == center)
        && (!z_hi || labels[loc + sxy] == center)
        && (!(y_lo && z_lo) || labels[loc - sx - sxy] == center)
        && (!(y_hi && z_lo) || labels[loc + sx - sxy] == center)
        && (!(y_lo && z_hi) || labels[loc - sx + sxy] == center)
        && (!(y_hi && z_hi) || labels[loc + sx + sxy] == center);

    if pure {
        center
    } else {
        T::zero()
    }
}

/// Incremental purity test checking only the +z row of the face. Valid
/// when the output at (x, y, z-1) already carries the center's label,
/// which certifies the rest of the face.
pub(crate) fn column_pure_front_z<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
) -> T {
    let Some(loc) = shape.column_base(xi, y, z) else {
        return T::zero();
    };
    let center = labels[loc];
    if center.is_zero() {
        return T::zero();
    }
    let sx = shape.sx;
    let y_lo = y > 0;
    let y_hi = y + 1 < shape.sy;

    if z + 1 >= shape.sz {
        return center;
    }
    let front = loc + shape.sxy;
    let pure = labels[front] == center
        && (!y_lo || labels[front - sx] == center)
        && (!y_hi || labels[front + sx] == center);

    if pure {
        center
    } else {
        T::zero()
    }
}

/// Incremental purity test checking only the +y row of the face. Valid
/// when the output at (x, y-1, z) already carries the center's label.
pub(crate) fn column_pure_front_y<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
) -> T {
    let Some(loc) = shape.column_base(xi, y, z) else {
        return T::zero();
    };
    let center = labels[loc];
    if center.is_zero() {
        return T::zero();
    }
    let sxy = shape.sxy;
    let z_lo = z > 0;
    let z_hi = z + 1 < shape.sz;

    if y + 1 >= shape.sy {
        return center;
    }
    let front = loc + shape.sx;
    let pure = labels[front] == center
        && (!z_lo || labels[front - sxy] == center)
        && (!z_hi || labels[front + sxy] == center);

    if pure {
        center
    } else {
        T::zero()
    }
}

/// Maximum over the in-range face of column `xi` centered at (y, z).
/// Returns `T::min_value()` when `xi` is out of range.
pub(crate) fn column_max<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
) -> T {
    let Some(loc) = shape.column_base(xi, y, z) else {
        return T::min_value();
    };
    fold_column(labels, shape, loc, y, z, |a, b| a.max(b))
}

/// Minimum over the in-range face of column `xi` centered at (y, z).
/// Returns `T::max_value()` when `xi` is out of range.
pub(crate) fn column_min<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    xi: isize,
    y: usize,
    z: usize,
) -> T {
    let Some(loc) = shape.column_base(xi, y, z) else {
        return T::max_value();
    };
    fold_column(labels, shape, loc, y, z, |a, b| a.min(b))
}

#[inline]
fn fold_column<T: VoxelElement>(
    labels: &[T],
    shape: VolumeShape,
    loc: usize,
    y: usize,
    z: usize,
    combine: impl Fn(T, T) -> T,
) -> T {
    let sx = shape.sx;
    let sxy = shape.sxy;
    let y_lo = y > 0;
    let y_hi = y + 1 < shape.sy;
    let z_lo = z > 0;
    let z_hi = z + 1 < shape.sz;

    let mut acc = labels[loc];
    if y_lo {
        acc = combine(acc, labels[loc - sx]);
    }
    if y_hi {
        acc = combine(acc, labels[loc + sx]);
    }
    if z_lo {
        acc = combine(acc, labels[loc - sxy]);
        if y_lo {
            acc = combine(acc, labels[loc - sx - sxy]);
        }
        if y_hi {
            acc = combine(acc, labels[loc + sx - sxy]);
        }
    }
    if z_hi {
        acc = combine(acc, labels[loc + sxy]);
        if y_lo {
            acc = combine(acc, labels[loc - sx + sxy]);
        }
        if y_hi {
            acc = combine(acc, labels[loc + sx + sxy]);
        }
    }
    acc
}

/// Shared handle to the output buffer for parallel block dispatch.
///
/// Blocks write pairwise-disjoint index ranges, and a sweep reads back
/// only cells its own block already wrote (the z-1/y-1 fast-path
/// probes), so no synchronization beyond the pool join is required.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SharedOutput<T> {
    ptr: *mut T,
    len: usize,
}

unsafe impl<T: Send> Send for SharedOutput<T> {}
unsafe impl<T: Send> Sync for SharedOutput<T> {}

impl<T: Copy> SharedOutput<T> {
    pub fn new(buffer: &mut [T]) -> Self {
        Self {
            ptr: buffer.as_mut_ptr(),
            len: buffer.len(),
        }
    }

    /// # Safety
    /// `loc` must be in bounds and inside the caller's block region; no
    /// other thread may access `loc` concurrently.
    #[inline]
    pub unsafe fn write(&self, loc: usize, value: T) {
        debug_assert!(loc < self.len);
        unsafe { *self.ptr.add(loc) = value }
    }

    /// # Safety
    /// `loc` must be in bounds and inside the caller's block region; no
    /// other thread may access `loc` concurrently.
    #[inline]
    pub unsafe fn read(&self, loc: usize) -> T {
        debug_assert!(loc < self.len);
        unsafe { *self.ptr.add(loc) }
    }
}
