//! Match triple: the shared input of the set-coefficient family.
//!
//! `(shared, left_only, right_only)` are multiset counts over the widened
//! elements of two values, computed by a sorted merge so duplicate elements
//! pair up at most once each.

use core_strings::StrValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTriple {
    /// Elements present in both values (multiset intersection size).
    pub shared: usize,
    /// Elements only in the left value.
    pub left_only: usize,
    /// Elements only in the right value.
    pub right_only: usize,
}

pub fn match_triple(a: &StrValue, b: &StrValue) -> MatchTriple {
    let mut xs: Vec<u64> = a.syms().collect();
    let mut ys: Vec<u64> = b.syms().collect();
    xs.sort_unstable();
    ys.sort_unstable();

    let mut shared = 0usize;
    let (mut i, mut j) = (0usize, 0usize);
    while i < xs.len() && j < ys.len() {
        match xs[i].cmp(&ys[j]) {
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    MatchTriple {
        shared,
        left_only: xs.len() - shared,
        right_only: ys.len() - shared,
    }
}
