//! Half-open index ranges with `"a:b"` parsing and `"B:k"` block splits.
//!
//! Range-parse violations warn and reset to the full range (the run still
//! produces a complete matrix); split violations are hard errors because a
//! silently wrong shard would corrupt a distributed result.

use thiserror::Error;
use tracing::warn;

/// Half-open interval `[start, end)` of indices into the original
/// collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The full range `[0, n)`.
    pub fn full(n: usize) -> Self {
        Self { start: 0, end: n }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, i: usize) -> bool {
        self.start <= i && i < self.end
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("malformed split specification `{0}`, expected `B:k`")]
    Malformed(String),
    #[error("block count {blocks} outside 1..={range_len}")]
    BadBlockCount { blocks: usize, range_len: usize },
    #[error("block index {index} outside 0..{blocks}")]
    BadBlockIndex { index: usize, blocks: usize },
    #[error("block {index} of {blocks} is empty for range length {range_len}")]
    EmptyBlock {
        index: usize,
        blocks: usize,
        range_len: usize,
    },
}

/// Parses `"a:b"` against collection size `n`. Missing `a` defaults to 0,
/// missing `b` to `n`; negative `b` counts from the end. Violations warn and
/// reset to the full range.
pub fn parse_range(spec: &str, n: usize) -> Range {
    let reset = |reason: &str| {
        warn!(
            target: "matrix.range",
            spec,
            n,
            reason,
            "range_reset_to_full"
        );
        Range::full(n)
    };

    let Some((a_part, b_part)) = spec.split_once(':') else {
        return reset("missing colon");
    };

    let start = if a_part.is_empty() {
        0
    } else {
        match a_part.parse::<usize>() {
            Ok(a) => a,
            Err(_) => return reset("unparsable start"),
        }
    };

    let end = if b_part.is_empty() {
        n
    } else {
        match b_part.parse::<i64>() {
            Ok(b) if b < 0 => {
                let Some(e) = (n as i64).checked_add(b).filter(|&e| e >= 0) else {
                    return reset("negative end before start of collection");
                };
                e as usize
            }
            Ok(b) => b as usize,
            Err(_) => return reset("unparsable end"),
        }
    };

    if start < end && end <= n {
        Range { start, end }
    } else {
        reset("bounds violation")
    }
}

/// Parses `"B:k"` and narrows `y` to block `k` of `B` equal-height blocks
/// (the last block may be shorter). Applied after `y`-range narrowing.
pub fn parse_split(spec: &str, y: Range) -> Result<Range, SplitError> {
    let Some((b_part, k_part)) = spec.split_once(':') else {
        return Err(SplitError::Malformed(spec.to_string()));
    };
    let (Ok(blocks), Ok(index)) = (b_part.parse::<usize>(), k_part.parse::<usize>()) else {
        return Err(SplitError::Malformed(spec.to_string()));
    };

    let range_len = y.len();
    if blocks == 0 || blocks > range_len {
        return Err(SplitError::BadBlockCount { blocks, range_len });
    }
    if index >= blocks {
        return Err(SplitError::BadBlockIndex { index, blocks });
    }

    let height = range_len.div_ceil(blocks);
    let start = y.start + index * height;
    let end = (start + height).min(y.end);
    if start >= y.end {
        return Err(SplitError::EmptyBlock {
            index,
            blocks,
            range_len,
        });
    }
    Ok(Range { start, end })
}
