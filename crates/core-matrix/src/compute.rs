//! Data-parallel matrix fill.
//!
//! The driver enumerates the stored cells as one linear work set and
//! evaluates the measure once per cell; for triangular shapes this collapses
//! both axes, so load stays balanced even though row lengths vary. Each
//! worker writes exactly the cell slot it owns through `par_iter_mut`, so
//! cell writes need no synchronization; only the progress counter is
//! shared. A sequential path (`threads == 1`) produces identical observable
//! results.

use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use core_strings::StrValue;

use crate::matrix::Matrix;
use crate::progress::{NullSink, Progress, ProgressSink};

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("matrix must be allocated before compute")]
    Unallocated,
    #[error("failed to build worker pool: {0}")]
    Pool(String),
}

/// Driver options. `threads == 0` uses the global rayon pool; `1` runs
/// sequentially in the calling thread.
pub struct ComputeOptions<'s> {
    pub threads: usize,
    pub sink: Option<&'s dyn ProgressSink>,
}

impl Default for ComputeOptions<'_> {
    fn default() -> Self {
        Self {
            threads: 0,
            sink: None,
        }
    }
}

/// Fills every cell of the active sub-rectangle with
/// `measure(strs[x], strs[y])`. For triangular shapes the skipped upper half
/// is defined by symmetry through `Matrix::get`. NaN and infinite scores are
/// stored verbatim.
///
/// The string collection is borrowed for the duration of the call and must
/// cover the matrix ranges; the measure must be pure and thread-safe.
pub fn compute<F>(
    matrix: &mut Matrix,
    strs: &[StrValue],
    measure: F,
    opts: &ComputeOptions<'_>,
) -> Result<(), ComputeError>
where
    F: Fn(&StrValue, &StrValue) -> f32 + Sync,
{
    if !matrix.is_allocated() {
        return Err(ComputeError::Unallocated);
    }
    let geom = matrix.geometry();
    let total = geom.size();
    let null_sink = NullSink;
    let progress = Progress::new(total, opts.sink.unwrap_or(&null_sink));
    let started = Instant::now();

    let values = matrix.values_mut();
    let fill = |values: &mut [f32]| {
        values.par_iter_mut().enumerate().for_each(|(t, cell)| {
            let (x, y) = geom.cell_at(t);
            *cell = measure(&strs[x], &strs[y]);
            progress.tick();
        });
    };

    match opts.threads {
        1 => {
            for (t, cell) in values.iter_mut().enumerate() {
                let (x, y) = geom.cell_at(t);
                *cell = measure(&strs[x], &strs[y]);
                progress.tick();
            }
        }
        0 => fill(values),
        n => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ComputeError::Pool(e.to_string()))?;
            pool.install(|| fill(values));
        }
    }

    let elapsed = started.elapsed();
    matrix.set_elapsed(elapsed);
    progress.finish();
    info!(
        target: "matrix.compute",
        cells = total,
        elapsed_ms = elapsed.as_millis() as u64,
        "fill_complete"
    );
    Ok(())
}
