//! One-way conversion of byte sequences into 64-bit token-id sequences.
//!
//! Two passes over the buffer:
//! 1. collapse every maximal run of delimiter bytes to a single occurrence of
//!    the canonical (lowest) delimiter byte;
//! 2. split at the canonical delimiter and hash each non-empty span into a
//!    token id.
//!
//! A value of length `L` yields at most `L/2 + 1` tokens; the output buffer
//! reserves that bound and shrinks. Applying the symbolizer to an already
//! tokenized value is a no-op.

use crate::delim::Delimiters;
use crate::hash::hash64;
use crate::value::StrValue;

/// Symbolizes a single value in place.
pub fn symbolize(value: &mut StrValue, delims: &Delimiters) {
    let Some(bytes) = value.bytes() else {
        return; // already tokenized
    };

    // Pass 1: canonicalize delimiter runs. With an empty delimiter set this
    // is the identity and the whole buffer becomes one span.
    let canonical = delims.canonical();
    let mut canon = Vec::with_capacity(bytes.len());
    let mut in_run = false;
    for &b in bytes {
        if delims.is_delimiter(b) {
            if !in_run {
                // canonical() is Some whenever any byte is marked
                canon.push(canonical.unwrap_or(b));
            }
            in_run = true;
        } else {
            canon.push(b);
            in_run = false;
        }
    }

    // Pass 2: emit token ids for non-empty spans. Leading delimiters produce
    // an empty first span and trailing ones an empty last span; both drop.
    let mut tokens = Vec::with_capacity(canon.len() / 2 + 1);
    match canonical {
        Some(sep) => {
            for span in canon.split(|&b| b == sep) {
                if !span.is_empty() {
                    tokens.push(hash64(span));
                }
            }
        }
        None => {
            if !canon.is_empty() {
                tokens.push(hash64(&canon));
            }
        }
    }
    tokens.shrink_to_fit();
    value.replace_with_tokens(tokens);
}

/// Symbolizes a whole collection. Called once, before ranges are configured
/// and before any compare runs.
pub fn symbolize_all(values: &mut [StrValue], delims: &Delimiters) {
    for v in values.iter_mut() {
        symbolize(v, delims);
    }
}
