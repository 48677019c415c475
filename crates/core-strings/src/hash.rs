//! Stable 64-bit hashing for token ids and pair fingerprints.
//!
//! XXH64 with a fixed seed: byte-stable across runs and platforms so token
//! ids, caches and test expectations stay reproducible.

use xxhash_rust::xxh64::xxh64;

use crate::value::{Seq, StrValue};

/// Seed shared by every hash call.
pub const HASH_SEED: u64 = 0xc0ffee;

/// Hashes a byte span into a token id.
#[inline]
pub fn hash64(data: &[u8]) -> u64 {
    xxh64(data, HASH_SEED)
}

/// Hashes a full string value regardless of representation. Token sequences
/// hash over their little-endian encoding so the result does not depend on
/// host byte order.
pub fn hash_value(v: &StrValue) -> u64 {
    match v.seq() {
        Seq::Bytes(b) => hash64(b),
        Seq::Tokens(t) => {
            let mut buf = Vec::with_capacity(t.len() * 8);
            for &tok in t {
                buf.extend_from_slice(&tok.to_le_bytes());
            }
            hash64(&buf)
        }
    }
}

/// Symmetric pair fingerprint: `h(a) XOR h(b)`, order-independent by
/// construction. Hosts may use it for caching; the engine never relies on it
/// for correctness.
#[inline]
pub fn hash2(a: &StrValue, b: &StrValue) -> u64 {
    hash_value(a) ^ hash_value(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_for_fixed_input() {
        // Same bytes, same seed, same id on every run and platform.
        assert_eq!(hash64(b"the"), hash64(b"the"));
        assert_ne!(hash64(b"the"), hash64(b"The"));
        assert_ne!(hash64(b""), hash64(b"\0"));
    }

    #[test]
    fn pair_hash_is_symmetric() {
        let a = StrValue::from_str("alpha", 0.0, 0);
        let b = StrValue::from_str("beta", 0.0, 1);
        assert_eq!(hash2(&a, &b), hash2(&b, &a));
        assert_eq!(hash2(&a, &b), hash_value(&a) ^ hash_value(&b));
    }

    #[test]
    fn pair_hash_of_equal_values_is_zero() {
        let a = StrValue::from_str("same", 0.0, 0);
        let b = StrValue::from_str("same", 0.0, 1);
        assert_eq!(hash2(&a, &b), 0);
    }

    #[test]
    fn token_values_hash_via_le_encoding() {
        let delims = crate::Delimiters::parse(" ").unwrap();
        let mut v = StrValue::from_str("one two", 0.0, 0);
        let mut w = StrValue::from_str("one two", 0.0, 1);
        crate::symbolize::symbolize(&mut v, &delims);
        crate::symbolize::symbolize(&mut w, &delims);
        // Identical token sequences hash identically, and differently from
        // the original byte form.
        assert_eq!(hash_value(&v), hash_value(&w));
        assert_ne!(hash_value(&v), hash64(b"one two"));
    }
}
