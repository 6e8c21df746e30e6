//! # Voxmorph Parallel
//!
//! Block partitioning and parallel dispatch for voxmorph kernels.
//!
//! This crate provides:
//! - Cubic/square block partitioning of a volume, one block per task
//! - Sequential or fixed-size-pool execution strategies using Rayon

pub mod blocks;
pub mod strategy;

pub use blocks::{Block, BlockGrid, BLOCK_2D, BLOCK_3D};
pub use strategy::{ParallelStrategy, ProcessingMode};
