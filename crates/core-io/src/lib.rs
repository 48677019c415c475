//! Input readers producing the string array and output writers consuming
//! the computed matrix.

pub mod read;
pub mod write;

pub use read::{ReadError, read_dir_entries, read_lines, read_stdin};
pub use write::{Format, WriteError, write_matrix};
