//! Integration tests comparing every kernel against a naive
//! 27-neighborhood reference implementation on deterministic synthetic
//! volumes, plus the literal scenarios and algebraic properties the
//! kernels guarantee (permutation equivariance, monotonicity, duality,
//! thread-count determinism).

use std::collections::BTreeMap;

use num_traits::NumCast;
use voxmorph_core::VoxelElement;
use voxmorph_kernels::{grey_dilate, grey_erode, multilabel_dilate, multilabel_erode};

// ---------------------------------------------------------------------------
// Naive reference implementations
// ---------------------------------------------------------------------------

fn loc(sx: usize, sy: usize, x: usize, y: usize, z: usize) -> usize {
    x + sx * (y + sy * z)
}

/// In-range neighbor positions of (x, y, z), including the center. The
/// z offsets collapse for single-slice volumes.
fn neighborhood(
    x: usize,
    y: usize,
    z: usize,
    sx: usize,
    sy: usize,
    sz: usize,
) -> Vec<(usize, usize, usize)> {
    let mut out = Vec::with_capacity(27);
    for dz in -1i64..=1 {
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                let nz = z as i64 + dz;
                if nx < 0 || ny < 0 || nz < 0 {
                    continue;
                }
                let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
                if nx >= sx || ny >= sy || nz >= sz {
                    continue;
                }
                out.push((nx, ny, nz));
            }
        }
    }
    out
}

fn reference_dilate<T: VoxelElement>(
    labels: &[T],
    sx: usize,
    sy: usize,
    sz: usize,
    background_only: bool,
) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let li = loc(sx, sy, x, y, z);
                if background_only && !labels[li].is_zero() {
                    out[li] = labels[li];
                    continue;
                }
                let mut counts: BTreeMap<T, usize> = BTreeMap::new();
                for (nx, ny, nz) in neighborhood(x, y, z, sx, sy, sz) {
                    let v = labels[loc(sx, sy, nx, ny, nz)];
                    if !v.is_zero() {
                        *counts.entry(v).or_insert(0) += 1;
                    }
                }
                // Ascending iteration plus a strict comparison makes the
                // smallest label win ties.
                let mut best = 0usize;
                let mut mode = T::zero();
                for (label, count) in counts {
                    if count > best {
                        best = count;
                        mode = label;
                    }
                }
                out[li] = mode;
            }
        }
    }
    out
}

fn reference_erode<T: VoxelElement>(labels: &[T], sx: usize, sy: usize, sz: usize) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let li = loc(sx, sy, x, y, z);
                let center = labels[li];
                if center.is_zero() {
                    continue;
                }
                let mut survives = true;
                // The full structuring element must be in range: the z
                // axis only participates when the volume has z extent.
                for dz in if sz > 1 { -1i64..=1 } else { 0..=0 } {
                    for dy in -1i64..=1 {
                        for dx in -1i64..=1 {
                            let nx = x as i64 + dx;
                            let ny = y as i64 + dy;
                            let nz = z as i64 + dz;
                            if nx < 0
                                || ny < 0
                                || nz < 0
                                || nx >= sx as i64
                                || ny >= sy as i64
                                || nz >= sz as i64
                            {
                                survives = false;
                            } else if labels
                                [loc(sx, sy, nx as usize, ny as usize, nz as usize)]
                                != center
                            {
                                survives = false;
                            }
                        }
                    }
                }
                if survives {
                    out[li] = center;
                }
            }
        }
    }
    out
}

fn reference_grey<T: VoxelElement>(
    labels: &[T],
    sx: usize,
    sy: usize,
    sz: usize,
    dilate: bool,
) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let li = loc(sx, sy, x, y, z);
                let mut acc = labels[li];
                for (nx, ny, nz) in neighborhood(x, y, z, sx, sy, sz) {
                    let v = labels[loc(sx, sy, nx, ny, nz)];
                    acc = if dilate { acc.max(v) } else { acc.min(v) };
                }
                out[li] = acc;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Deterministic synthetic volumes
// ---------------------------------------------------------------------------

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Sparse random labels drawn from 0..num_labels (0 is background).
fn random_labels<T: VoxelElement>(len: usize, num_labels: u64, seed: u64) -> Vec<T> {
    let mut lcg = Lcg(seed);
    (0..len)
        .map(|_| NumCast::from(lcg.next() % num_labels).unwrap())
        .collect()
}

/// Coarse blocky labels: uniform 3x3x3 zones exist, so erosion has
/// survivors and dilation has uniform-window fast paths to take.
fn blocky_labels<T: VoxelElement>(sx: usize, sy: usize, sz: usize, seed: u64) -> Vec<T> {
    let mut lcg = Lcg(seed);
    let mut out = vec![T::zero(); sx * sy * sz];
    // Salt a blocky partition with occasional random voxels.
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let zone = (x / 5 + 2 * (y / 5) + 4 * (z / 5)) % 4;
                out[loc(sx, sy, x, y, z)] = NumCast::from(zone).unwrap();
            }
        }
    }
    for _ in 0..(sx * sy * sz / 37) {
        let i = (lcg.next() as usize) % out.len();
        out[i] = NumCast::from(lcg.next() % 4).unwrap();
    }
    out
}

fn run_dilate<T: VoxelElement>(
    labels: &[T],
    sx: usize,
    sy: usize,
    sz: usize,
    background_only: bool,
    threads: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    multilabel_dilate(labels, &mut out, sx, sy, sz, background_only, threads).unwrap();
    out
}

fn run_erode<T: VoxelElement>(
    labels: &[T],
    sx: usize,
    sy: usize,
    sz: usize,
    threads: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    multilabel_erode(labels, &mut out, sx, sy, sz, threads).unwrap();
    out
}

fn run_grey<T: VoxelElement>(
    labels: &[T],
    sx: usize,
    sy: usize,
    sz: usize,
    dilate: bool,
    threads: usize,
) -> Vec<T> {
    let mut out = vec![T::zero(); labels.len()];
    if dilate {
        grey_dilate(labels, &mut out, sx, sy, sz, threads).unwrap();
    } else {
        grey_erode(labels, &mut out, sx, sy, sz, threads).unwrap();
    }
    out
}

/// Shapes covering 3D, 2D, degenerate axes and block-straddling sizes
/// (the 3D block edge is 64).
const SHAPES: &[(usize, usize, usize)] = &[
    (1, 1, 1),
    (3, 3, 3),
    (9, 1, 1),
    (1, 9, 1),
    (7, 6, 5),
    (5, 5, 2),
    (16, 16, 16),
    (33, 17, 1),
    (70, 66, 3),
    (66, 3, 66),
];

// ---------------------------------------------------------------------------
// Reference equality
// ---------------------------------------------------------------------------

#[test]
fn multilabel_dilate_matches_reference() {
    for &(sx, sy, sz) in SHAPES {
        let len = sx * sy * sz;
        for (seed, labels) in [
            (1u64, random_labels::<u32>(len, 4, 11)),
            (2, random_labels::<u32>(len, 2, 22)),
            (3, blocky_labels::<u32>(sx, sy, sz, 33)),
        ] {
            for background_only in [false, true] {
                let expected = reference_dilate(&labels, sx, sy, sz, background_only);
                for threads in [0usize, 4] {
                    let got = run_dilate(&labels, sx, sy, sz, background_only, threads);
                    assert_eq!(
                        got, expected,
                        "shape ({sx}, {sy}, {sz}), seed {seed}, \
                         background_only {background_only}, threads {threads}"
                    );
                }
            }
        }
    }
}

#[test]
fn multilabel_erode_matches_reference() {
    for &(sx, sy, sz) in SHAPES {
        let len = sx * sy * sz;
        for (seed, labels) in [
            (1u64, random_labels::<u32>(len, 3, 44)),
            (2, blocky_labels::<u32>(sx, sy, sz, 55)),
            (3, vec![6u32; len]),
        ] {
            let expected = reference_erode(&labels, sx, sy, sz);
            for threads in [0usize, 4] {
                let got = run_erode(&labels, sx, sy, sz, threads);
                assert_eq!(
                    got, expected,
                    "shape ({sx}, {sy}, {sz}), seed {seed}, threads {threads}"
                );
            }
        }
    }
}

#[test]
fn grey_kernels_match_reference() {
    for &(sx, sy, sz) in SHAPES {
        let len = sx * sy * sz;
        // The full u8 range makes absorbing values (0 and 255) common
        // enough to exercise the saturation skips.
        let labels = random_labels::<u8>(len, 256, 66);
        for dilate in [true, false] {
            let expected = reference_grey(&labels, sx, sy, sz, dilate);
            for threads in [0usize, 4] {
                let got = run_grey(&labels, sx, sy, sz, dilate, threads);
                assert_eq!(
                    got, expected,
                    "shape ({sx}, {sy}, {sz}), dilate {dilate}, threads {threads}"
                );
            }
        }
    }
}

macro_rules! element_type_roundtrip {
    ($name:ident, $t:ty) => {
        #[test]
        fn $name() {
            let (sx, sy, sz) = (12, 10, 9);
            let labels = blocky_labels::<$t>(sx, sy, sz, 0x77);
            assert_eq!(
                run_dilate(&labels, sx, sy, sz, false, 2),
                reference_dilate(&labels, sx, sy, sz, false)
            );
            assert_eq!(
                run_erode(&labels, sx, sy, sz, 2),
                reference_erode(&labels, sx, sy, sz)
            );
            assert_eq!(
                run_grey(&labels, sx, sy, sz, true, 2),
                reference_grey(&labels, sx, sy, sz, true)
            );
            assert_eq!(
                run_grey(&labels, sx, sy, sz, false, 2),
                reference_grey(&labels, sx, sy, sz, false)
            );
        }
    };
}

element_type_roundtrip!(element_u8, u8);
element_type_roundtrip!(element_u16, u16);
element_type_roundtrip!(element_u32, u32);
element_type_roundtrip!(element_u64, u64);
element_type_roundtrip!(element_i8, i8);
element_type_roundtrip!(element_i16, i16);
element_type_roundtrip!(element_i32, i32);
element_type_roundtrip!(element_i64, i64);

// ---------------------------------------------------------------------------
// Literal scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_single_label_dilates_everywhere() {
    let mut labels = vec![0u32; 27];
    labels[loc(3, 3, 1, 1, 1)] = 5;
    let out = run_dilate(&labels, 3, 3, 3, false, 1);
    assert!(out.iter().all(|&v| v == 5));
}

#[test]
fn scenario_background_only_single_label() {
    let mut labels = vec![0u32; 27];
    labels[loc(3, 3, 1, 1, 1)] = 5;
    let out = run_dilate(&labels, 3, 3, 3, true, 1);
    assert!(out.iter().all(|&v| v == 5));
}

#[test]
fn scenario_uniform_cube_erodes_to_center() {
    let labels = vec![7u32; 27];
    let out = run_erode(&labels, 3, 3, 3, 1);
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                let expected = if (x, y, z) == (1, 1, 1) { 7 } else { 0 };
                assert_eq!(out[loc(3, 3, x, y, z)], expected);
            }
        }
    }
}

#[test]
fn scenario_mode_tie_break() {
    // Six face-neighbors of the center carry label A, the center
    // carries B: the mode at the center is A.
    let (a, b) = (2u32, 9u32);
    let mut labels = vec![0u32; 27];
    labels[loc(3, 3, 1, 1, 1)] = b;
    for (x, y, z) in [(0, 1, 1), (2, 1, 1), (1, 0, 1), (1, 2, 1), (1, 1, 0), (1, 1, 2)] {
        labels[loc(3, 3, x, y, z)] = a;
    }
    let out = run_dilate(&labels, 3, 3, 3, false, 1);
    assert_eq!(out[loc(3, 3, 1, 1, 1)], a);
}

#[test]
fn scenario_grey_peak() {
    let mut labels = vec![0u8; 25];
    labels[loc(5, 5, 2, 2, 0)] = 9;

    let dilated = run_grey(&labels, 5, 5, 1, true, 2);
    for y in 0..5 {
        for x in 0..5 {
            let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                9
            } else {
                0
            };
            assert_eq!(dilated[loc(5, 5, x, y, 0)], expected);
        }
    }

    let eroded = run_grey(&labels, 5, 5, 1, false, 2);
    assert!(eroded.iter().all(|&v| v == 0));
}

// ---------------------------------------------------------------------------
// Fast-path threshold boundaries
// ---------------------------------------------------------------------------

/// Build a 6x3x3 volume of label `fill` and then empty `zeros` cells of
/// the column at `x = col`, counted from the face top.
fn uniform_with_thinned_column(fill: u32, col: usize, zeros: usize) -> Vec<u32> {
    let (sx, sy, sz) = (6, 3, 3);
    let mut labels = vec![fill; sx * sy * sz];
    let mut removed = 0;
    'outer: for z in 0..sz {
        for y in 0..sy {
            if removed == zeros {
                break 'outer;
            }
            labels[loc(sx, sy, col, y, z)] = 0;
            removed += 1;
        }
    }
    labels
}

#[test]
fn uniform_pair_threshold_boundary() {
    // Uniform middle+right faces with exactly 14 labels take the
    // two-voxel fast path; with 13 they fall through to the full mode
    // scan. Both must match the reference.
    for zeros in [4usize, 5] {
        // Column 3 keeps 9 - zeros labels; column 2 keeps 9: the window
        // at x = 2 sees |middle| + |right| = 18 - zeros.
        let labels = uniform_with_thinned_column(7, 3, zeros);
        let expected = reference_dilate(&labels, 6, 3, 3, false);
        let got = run_dilate(&labels, 6, 3, 3, false, 1);
        assert_eq!(got, expected, "zeros = {zeros}");
    }
}

#[test]
fn winning_run_threshold_boundary() {
    // Full windows whose winning run holds exactly 23 vs 22 copies of
    // the mode label. A foreign label inside the middle face keeps the
    // uniform-pair path from short-circuiting first, so the sweep must
    // reach the run scan.
    for zeros in [3usize, 4] {
        let mut labels = uniform_with_thinned_column(7, 1, zeros);
        labels[loc(6, 3, 2, 0, 0)] = 9;
        let expected = reference_dilate(&labels, 6, 3, 3, false);
        let got = run_dilate(&labels, 6, 3, 3, false, 1);
        assert_eq!(got, expected, "zeros = {zeros}");
    }
}

// ---------------------------------------------------------------------------
// Algebraic properties
// ---------------------------------------------------------------------------

#[test]
fn determinism_across_thread_counts() {
    let (sx, sy, sz) = (70, 66, 65);
    let labels = blocky_labels::<u32>(sx, sy, sz, 0xabc);
    let grey = random_labels::<u8>(sx * sy * sz, 256, 0xdef);

    let dilate_base = run_dilate(&labels, sx, sy, sz, false, 0);
    let erode_base = run_erode(&labels, sx, sy, sz, 0);
    let grey_base = run_grey(&grey, sx, sy, sz, true, 0);
    for threads in [1usize, 2, 7, 32] {
        assert_eq!(run_dilate(&labels, sx, sy, sz, false, threads), dilate_base);
        assert_eq!(run_erode(&labels, sx, sy, sz, threads), erode_base);
        assert_eq!(run_grey(&grey, sx, sy, sz, true, threads), grey_base);
    }
}

#[test]
fn label_permutation_equivariance() {
    // For a bijection on the label set fixing zero,
    // kernel(permute(in)) == permute(kernel(in)).
    let permutation: [u32; 7] = [0, 4, 1, 6, 2, 5, 3];
    let permute =
        |labels: &[u32]| -> Vec<u32> { labels.iter().map(|&v| permutation[v as usize]).collect() };

    let (sx, sy, sz) = (14, 13, 12);
    let mut labels = blocky_labels::<u32>(sx, sy, sz, 0x123);
    // Widen the label alphabet to use the whole permutation domain.
    for (i, v) in labels.iter_mut().enumerate() {
        if i % 11 == 0 {
            *v = 4 + (i as u32 % 3);
        }
    }

    for background_only in [false, true] {
        // Permutations break the smallest-label tie rule, so compare
        // only where the reference mode is unique under both labelings.
        let direct = run_dilate(&permute(&labels), sx, sy, sz, background_only, 1);
        let lifted = permute(&run_dilate(&labels, sx, sy, sz, background_only, 1));
        let unique = |labels: &[u32], i: usize| -> bool {
            let (x, y, z) = (i % sx, (i / sx) % sy, i / (sx * sy));
            let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
            for (nx, ny, nz) in neighborhood(x, y, z, sx, sy, sz) {
                let v = labels[loc(sx, sy, nx, ny, nz)];
                if v != 0 {
                    *counts.entry(v).or_insert(0) += 1;
                }
            }
            let best = counts.values().copied().max().unwrap_or(0);
            counts.values().filter(|&&c| c == best).count() <= 1
        };
        for i in 0..labels.len() {
            if unique(&labels, i) {
                assert_eq!(direct[i], lifted[i], "voxel {i}");
            }
        }
    }

    // Erosion has no tie-breaking: equivariance is exact.
    let direct = run_erode(&permute(&labels), sx, sy, sz, 1);
    let lifted = permute(&run_erode(&labels, sx, sy, sz, 1));
    assert_eq!(direct, lifted);
}

#[test]
fn grey_monotonicity() {
    let (sx, sy, sz) = (13, 11, 7);
    let len = sx * sy * sz;
    let lower = random_labels::<u8>(len, 200, 0x31);
    let bump = random_labels::<u8>(len, 40, 0x32);
    let upper: Vec<u8> = lower
        .iter()
        .zip(bump.iter())
        .map(|(&a, &b)| a.saturating_add(b))
        .collect();

    for dilate in [true, false] {
        let lo = run_grey(&lower, sx, sy, sz, dilate, 1);
        let hi = run_grey(&upper, sx, sy, sz, dilate, 1);
        for (a, b) in lo.iter().zip(hi.iter()) {
            assert!(a <= b, "dilate = {dilate}");
        }
    }
}

#[test]
fn grey_duality_under_complement() {
    let (sx, sy, sz) = (9, 8, 7);
    let labels = random_labels::<u16>(sx * sy * sz, 65536, 0x99);
    let complement: Vec<u16> = labels.iter().map(|&v| !v).collect();

    let eroded = run_grey(&labels, sx, sy, sz, false, 2);
    let dilated: Vec<u16> = run_grey(&complement, sx, sy, sz, true, 2)
        .iter()
        .map(|&v| !v)
        .collect();
    assert_eq!(eroded, dilated);
}

#[test]
fn multilabel_outputs_only_input_labels() {
    let (sx, sy, sz) = (17, 9, 8);
    let labels = random_labels::<u32>(sx * sy * sz, 5, 0x55);
    let out = run_dilate(&labels, sx, sy, sz, false, 1);
    assert!(out.iter().all(|&v| v < 5));

    let out = run_erode(&labels, sx, sy, sz, 1);
    for (i, &v) in out.iter().enumerate() {
        assert!(v == 0 || v == labels[i]);
    }
}
