//! Error types for voxmorph

use thiserror::Error;

/// Main error type for voxmorph operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid volume dimensions: {sx}x{sy}x{sz}")]
    InvalidDimensions { sx: usize, sy: usize, sz: usize },

    #[error("Buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Index out of bounds: ({x}, {y}, {z}) in volume of size ({sx}, {sy}, {sz})")]
    IndexOutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        sx: usize,
        sy: usize,
        sz: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for voxmorph operations
pub type Result<T> = std::result::Result<T, Error>;
