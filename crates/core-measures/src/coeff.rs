//! The set-coefficient family: closed forms over the match triple.
//!
//! Zero-denominator policy: two empty values are identical (similarity 1);
//! any other degenerate denominator yields 0. No coefficient ever returns
//! NaN, so downstream writers stay well-behaved.

use anyhow::Result;

use core_config::MeasureConfig;
use core_strings::StrValue;

use crate::Measure;
use crate::triple::match_triple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoeffKind {
    Jaccard,
    Dice,
    Simpson,
    BraunBlanquet,
    Kulczynski,
    SokalSneath,
    Otsuka,
}

/// One registered coefficient; the kind selects the closed form.
#[derive(Debug, Clone)]
pub struct Coefficient {
    kind: CoeffKind,
}

impl Coefficient {
    pub fn new(kind: CoeffKind) -> Self {
        Self { kind }
    }
}

#[inline]
fn ratio(num: f64, denom: f64) -> f64 {
    if denom > 0.0 { num / denom } else { 0.0 }
}

impl Measure for Coefficient {
    fn configure(&mut self, _cfg: &MeasureConfig) -> Result<()> {
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        let t = match_triple(a, b);
        let (sh, lo, ro) = (t.shared as f64, t.left_only as f64, t.right_only as f64);
        let s = match self.kind {
            CoeffKind::Jaccard => ratio(sh, sh + lo + ro),
            CoeffKind::Dice => ratio(2.0 * sh, 2.0 * sh + lo + ro),
            CoeffKind::Simpson => ratio(sh, (sh + lo).min(sh + ro)),
            CoeffKind::BraunBlanquet => ratio(sh, (sh + lo).max(sh + ro)),
            CoeffKind::Kulczynski => (ratio(sh, sh + lo) + ratio(sh, sh + ro)) / 2.0,
            CoeffKind::SokalSneath => ratio(sh, sh + 2.0 * (lo + ro)),
            CoeffKind::Otsuka => ratio(sh, ((sh + lo) * (sh + ro)).sqrt()),
        };
        s as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_strings::{Delimiters, symbolize};

    fn tokens(s: &str) -> StrValue {
        let mut v = StrValue::from_str(s, 0.0, 0);
        symbolize(&mut v, &Delimiters::parse(" ").unwrap());
        v
    }

    fn score(kind: CoeffKind, a: &str, b: &str) -> f32 {
        Coefficient::new(kind).compare(&tokens(a), &tokens(b))
    }

    #[test]
    fn jaccard_on_the_reference_triple() {
        // {a,b,c} vs {b,c,d}: (A,B,C) = (2,1,1) -> 2/4.
        assert_eq!(score(CoeffKind::Jaccard, "a b c", "b c d"), 0.5);
    }

    #[test]
    fn closed_forms_on_the_reference_triple() {
        // (A,B,C) = (2,1,1)
        assert_eq!(score(CoeffKind::Dice, "a b c", "b c d"), 4.0 / 6.0);
        assert_eq!(score(CoeffKind::Simpson, "a b c", "b c d"), 2.0 / 3.0);
        assert_eq!(score(CoeffKind::BraunBlanquet, "a b c", "b c d"), 2.0 / 3.0);
        assert_eq!(score(CoeffKind::Kulczynski, "a b c", "b c d"), 2.0 / 3.0);
        assert_eq!(score(CoeffKind::SokalSneath, "a b c", "b c d"), 2.0 / 6.0);
        let otsuka = score(CoeffKind::Otsuka, "a b c", "b c d");
        assert!((otsuka as f64 - 2.0 / 3.0).abs() < 1e-7);
    }

    #[test]
    fn identical_values_score_one() {
        for kind in [
            CoeffKind::Jaccard,
            CoeffKind::Dice,
            CoeffKind::Simpson,
            CoeffKind::BraunBlanquet,
            CoeffKind::Kulczynski,
            CoeffKind::SokalSneath,
            CoeffKind::Otsuka,
        ] {
            assert_eq!(score(kind, "x y z", "x y z"), 1.0, "{kind:?}");
        }
    }

    #[test]
    fn disjoint_values_score_zero() {
        for kind in [
            CoeffKind::Jaccard,
            CoeffKind::Dice,
            CoeffKind::Simpson,
            CoeffKind::BraunBlanquet,
            CoeffKind::Kulczynski,
            CoeffKind::SokalSneath,
            CoeffKind::Otsuka,
        ] {
            assert_eq!(score(kind, "a b", "c d"), 0.0, "{kind:?}");
        }
    }

    #[test]
    fn zero_denominators_never_produce_nan() {
        for kind in [
            CoeffKind::Jaccard,
            CoeffKind::Dice,
            CoeffKind::Simpson,
            CoeffKind::BraunBlanquet,
            CoeffKind::Kulczynski,
            CoeffKind::SokalSneath,
            CoeffKind::Otsuka,
        ] {
            // Both empty: identical.
            assert_eq!(score(kind, "", ""), 1.0, "{kind:?}");
            // One empty: nothing shared.
            assert_eq!(score(kind, "", "a b"), 0.0, "{kind:?}");
            assert_eq!(score(kind, "a b", ""), 0.0, "{kind:?}");
        }
    }
}
