//! Pairwise score matrix: range and block semantics, triangular and
//! rectangular storage, and the data-parallel fill driver.

pub mod compute;
pub mod matrix;
pub mod progress;
pub mod range;

pub use compute::{ComputeError, ComputeOptions, compute};
pub use matrix::{Matrix, MatrixError};
pub use progress::{NullSink, Progress, ProgressSink};
pub use range::{Range, SplitError, parse_range, parse_split};
