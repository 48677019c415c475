//! String values and the tokenization pipeline feeding the measures.
//!
//! A [`StrValue`] carries either a raw byte sequence (as produced by a
//! reader) or a sequence of 64-bit token ids (after symbolization), plus the
//! per-string metadata the matrix copies out for downstream writers. The
//! [`Delimiters`] table and [`symbolize`] implement the one-way byte → token
//! conversion; [`hash`] provides the stable seeded hash both for token ids
//! and for order-independent pair fingerprints.

pub mod delim;
pub mod hash;
pub mod symbolize;
pub mod value;

pub use delim::Delimiters;
pub use hash::{HASH_SEED, hash2, hash64, hash_value};
pub use symbolize::{symbolize, symbolize_all};
pub use value::{Seq, StrValue};
