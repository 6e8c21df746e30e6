//! Label morphology demo: synthetic segmentation cleanup
//!
//! Generates a 64x64x64 segmentation-like volume with:
//! - Two solid labeled bodies (labels 1 and 2) separated by a gap
//! - A thin bridge of label 3 between them
//! - Scattered single-voxel "speckle" labels
//!
//! Then runs each kernel over it and prints per-label voxel counts, so
//! the effect of every operation is visible at a glance:
//!   1. dilate (background_only) — grows bodies into the gap
//!   2. dilate (competitive)     — lets bodies overwrite the speckle
//!   3. erode                    — strips surfaces, removes the bridge
//!   4. grey dilate / grey erode — max/min filters on the raw values
//!
//! Run:
//!   cargo run -p voxmorph-kernels --example label_morphology

use std::collections::BTreeMap;

use voxmorph_core::{Algorithm, VoxelGrid};
use voxmorph_kernels::{
    DilateParams, ErodeParams, GreyDilate, GreyErode, GreyParams, MultilabelDilate,
    MultilabelErode,
};

const SIZE: usize = 64;
const THREADS: usize = 4;

fn main() {
    let input = build_segmentation();
    println!("Synthetic segmentation: {SIZE}x{SIZE}x{SIZE}");
    print_counts("input", &input);

    let dilate = MultilabelDilate::default();
    let erode = MultilabelErode::default();

    let grown = dilate
        .execute(
            input.clone(),
            DilateParams {
                background_only: true,
                threads: THREADS,
            },
        )
        .expect("dilate failed");
    print_counts("dilate (background only)", &grown);

    let fought = dilate
        .execute(
            input.clone(),
            DilateParams {
                background_only: false,
                threads: THREADS,
            },
        )
        .expect("dilate failed");
    print_counts("dilate (competitive)", &fought);

    let eroded = erode
        .execute(input.clone(), ErodeParams { threads: THREADS })
        .expect("erode failed");
    print_counts("erode", &eroded);

    let grey_params = GreyParams { threads: THREADS };
    let grey_max = GreyDilate::default()
        .execute(input.clone(), grey_params.clone())
        .expect("grey dilate failed");
    print_counts("grey dilate", &grey_max);

    let grey_min = GreyErode::default()
        .execute(input, grey_params)
        .expect("grey erode failed");
    print_counts("grey erode", &grey_min);
}

fn build_segmentation() -> VoxelGrid<u32> {
    let mut grid = VoxelGrid::new(SIZE, SIZE, SIZE);

    // Two bodies with a two-voxel gap between them.
    fill_box(&mut grid, (8, 8, 8), (28, 40, 40), 1);
    fill_box(&mut grid, (31, 8, 8), (52, 40, 40), 2);

    // A one-voxel-thick bridge of a third label across the gap.
    fill_box(&mut grid, (28, 20, 20), (31, 21, 21), 3);

    // Speckle: isolated voxels of a noise label.
    let mut state = 0x5eed_u64;
    for _ in 0..300 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let i = (state >> 33) as usize;
        let (x, y, z) = (i % SIZE, (i / SIZE) % SIZE, (i / (SIZE * SIZE)) % SIZE);
        if grid.get(x, y, z).unwrap() == 0 {
            grid.set(x, y, z, 9).unwrap();
        }
    }

    grid
}

fn fill_box(
    grid: &mut VoxelGrid<u32>,
    lo: (usize, usize, usize),
    hi: (usize, usize, usize),
    label: u32,
) {
    for z in lo.2..hi.2 {
        for y in lo.1..hi.1 {
            for x in lo.0..hi.0 {
                grid.set(x, y, z, label).expect("box out of range");
            }
        }
    }
}

fn print_counts(name: &str, grid: &VoxelGrid<u32>) {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &v in grid.as_slice() {
        *counts.entry(v).or_insert(0) += 1;
    }
    let summary: Vec<String> = counts
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    println!("  {name:<26} {}", summary.join(", "));
}
