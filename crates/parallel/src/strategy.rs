//! Parallel processing strategies

use rayon::prelude::*;
use voxmorph_core::{Error, Result};

/// Processing mode for kernel dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Single-threaded processing on the calling thread
    Sequential,
    /// Parallel processing using all available cores
    Parallel,
    /// Parallel with a fixed number of worker threads
    ParallelWith(usize),
}

impl Default for ProcessingMode {
    fn default() -> Self {
        ProcessingMode::Parallel
    }
}

impl ProcessingMode {
    /// Map a requested worker count onto a mode. Zero means synchronous
    /// execution on the calling thread; one worker is equivalent.
    pub fn from_threads(threads: usize) -> Self {
        match threads {
            0 | 1 => ProcessingMode::Sequential,
            n => ProcessingMode::ParallelWith(n),
        }
    }
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Execute a function over indices, joining before return
    fn par_for_each<F>(&self, range: std::ops::Range<usize>, f: F) -> Result<()>
    where
        F: Fn(usize) + Sync + Send;
}

impl ParallelStrategy for ProcessingMode {
    fn par_for_each<F>(&self, range: std::ops::Range<usize>, f: F) -> Result<()>
    where
        F: Fn(usize) + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => {
                for i in range {
                    f(i);
                }
                Ok(())
            }
            ProcessingMode::Parallel => {
                range.into_par_iter().for_each(f);
                Ok(())
            }
            ProcessingMode::ParallelWith(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?;
                pool.install(|| {
                    range.into_par_iter().for_each(f);
                });
                Ok(())
            }
        }
    }
}
