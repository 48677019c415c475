//! Input readers. Every reader produces an ordered `Vec<StrValue>` with
//! `idx` set to the collection position; the engine never re-reads input.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use core_strings::StrValue;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("input directory {0} contains no readable files")]
    EmptyDir(String),
}

/// One string per line. With `labeled`, a `<float>,` prefix becomes the
/// class label; an unparsable prefix warns and keeps the whole line with
/// label 0.
pub fn read_lines(path: &Path, labeled: bool) -> Result<Vec<StrValue>, ReadError> {
    let file = File::open(path)?;
    from_buf(BufReader::new(file), labeled)
}

/// Line reader over standard input.
pub fn read_stdin(labeled: bool) -> Result<Vec<StrValue>, ReadError> {
    from_buf(io::stdin().lock(), labeled)
}

fn from_buf<R: BufRead>(reader: R, labeled: bool) -> Result<Vec<StrValue>, ReadError> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let idx = out.len();
        let (label, content) = if labeled {
            match line.split_once(',') {
                Some((prefix, rest)) => match prefix.trim().parse::<f64>() {
                    Ok(label) => (label, rest.to_string()),
                    Err(_) => {
                        warn!(
                            target: "io.read",
                            line = idx,
                            "unparsable_label_prefix_keeping_line"
                        );
                        (0.0, line)
                    }
                },
                None => {
                    warn!(target: "io.read", line = idx, "missing_label_prefix");
                    (0.0, line)
                }
            }
        } else {
            (0.0, line)
        };
        out.push(StrValue::from_bytes(content.into_bytes(), label, idx));
    }
    Ok(out)
}

/// One string per regular file in `dir`, ordered by file name for
/// reproducible indices. The file name becomes the source tag; a leading
/// numeric component of the name (up to the first `_` or `.`) becomes the
/// label when present.
pub fn read_dir_entries(dir: &Path) -> Result<Vec<StrValue>, ReadError> {
    let mut names: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.path())
        .collect();
    names.sort();
    if names.is_empty() {
        return Err(ReadError::EmptyDir(dir.display().to_string()));
    }

    let mut out = Vec::with_capacity(names.len());
    for path in names {
        let mut bytes = Vec::new();
        File::open(&path)?.read_to_end(&mut bytes)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = name
            .split(['_', '.'])
            .next()
            .and_then(|p| p.parse::<f64>().ok())
            .unwrap_or(0.0);
        let idx = out.len();
        out.push(StrValue::from_bytes(bytes, label, idx).with_src(name));
    }
    Ok(out)
}
