//! # Voxmorph Core
//!
//! Core types and traits for the voxmorph morphology library.
//!
//! This crate provides:
//! - `VoxelGrid<T>`: generic dense voxel grid type (2D images are
//!   single-slice grids)
//! - `VoxelElement`: trait bounding the integer element types
//! - `Error`/`Result`: shared error type
//! - The `Algorithm` trait for a consistent operation API

pub mod error;
pub mod volume;

pub use error::{Error, Result};
pub use volume::{VoxelElement, VoxelGrid};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::volume::{VoxelElement, VoxelGrid};
    pub use crate::Algorithm;
}

/// Core trait for all operations in voxmorph.
///
/// Operations are pure functions that transform input data according to
/// parameters.
pub trait Algorithm {
    /// Input type for the operation
    type Input;
    /// Output type for the operation
    type Output;
    /// Parameters controlling operation behavior
    type Params: Default;
    /// Error type for operation execution
    type Error: std::error::Error;

    /// Returns the operation name
    fn name(&self) -> &'static str;

    /// Returns a description of what the operation does
    fn description(&self) -> &'static str;

    /// Execute the operation
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
