//! Output writers. Both formats read the matrix only through its public
//! accessors, so triangular storage is transparent: mirror cells resolve
//! through `get`.

use std::io::{self, Write};

use thiserror::Error;
use tracing::warn;

use core_matrix::Matrix;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Output format selector. Unknown names warn and fall back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Libsvm,
}

impl Format {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => Format::Text,
            "libsvm" => Format::Libsvm,
            other => {
                warn!(target: "io.write", format = other, "unknown_format_using_text");
                Format::Text
            }
        }
    }
}

/// Writes the active sub-rectangle in the selected format.
pub fn write_matrix<W: Write>(
    matrix: &Matrix,
    w: &mut W,
    format: Format,
    precision: usize,
) -> Result<(), WriteError> {
    match format {
        Format::Text => write_text(matrix, w, precision),
        Format::Libsvm => write_libsvm(matrix, w, precision),
    }
}

/// Plain text: a comment header describing the shape, then one row per `y`
/// with the scores for every `x` of the active sub-rectangle.
fn write_text<W: Write>(matrix: &Matrix, w: &mut W, precision: usize) -> Result<(), WriteError> {
    let (x, y, triangular) = matrix.active_ranges();
    writeln!(
        w,
        "# x {}:{} y {}:{} triangular {}",
        x.start, x.end, y.start, y.end, triangular
    )?;
    for yi in y.start..y.end {
        let mut first = true;
        for xi in x.start..x.end {
            if !first {
                write!(w, " ")?;
            }
            write!(w, "{:.precision$}", matrix.get(xi, yi))?;
            first = false;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// libsvm rows: `<label> <j>:<value> ...` where `j` is the 1-based absolute
/// x index, one row per `y`, labels resolved through the metadata carry.
fn write_libsvm<W: Write>(matrix: &Matrix, w: &mut W, precision: usize) -> Result<(), WriteError> {
    let (x, y, _) = matrix.active_ranges();
    for yi in y.start..y.end {
        write!(w, "{}", matrix.label(yi))?;
        for xi in x.start..x.end {
            write!(w, " {}:{:.precision$}", xi + 1, matrix.get(xi, yi))?;
        }
        writeln!(w)?;
    }
    Ok(())
}
