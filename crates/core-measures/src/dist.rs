//! Edit-distance measures over the widened element sequences.
//!
//! All distances here work identically on byte values and token values.
//! `compare(a, b)` is the cost of editing `a` into `b`; with the default
//! equal costs every distance in this module is bit-exactly symmetric.

use ahash::AHashMap;
use anyhow::Result;
use tracing::warn;

use core_config::MeasureConfig;
use core_strings::StrValue;

use crate::Measure;

/// Length normalization for distance values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Norm {
    #[default]
    None,
    Min,
    Max,
    Avg,
}

impl Norm {
    /// Parses a normalization name, warning and falling back to `None` for
    /// unknown values.
    pub fn parse(s: &str) -> Self {
        match s {
            "none" => Norm::None,
            "min" => Norm::Min,
            "max" => Norm::Max,
            "avg" => Norm::Avg,
            other => {
                warn!(target: "measures", norm = other, "unknown_norm_using_none");
                Norm::None
            }
        }
    }

    /// Applies the normalization. Two empty inputs normalize to 0 rather
    /// than NaN.
    #[inline]
    pub fn apply(self, d: f32, la: usize, lb: usize) -> f32 {
        let denom = match self {
            Norm::None => return d,
            Norm::Min => la.min(lb) as f32,
            Norm::Max => la.max(lb) as f32,
            Norm::Avg => (la + lb) as f32 / 2.0,
        };
        if denom == 0.0 { 0.0 } else { d / denom }
    }
}

/// Weighted Levenshtein distance.
#[derive(Debug, Clone)]
pub struct Levenshtein {
    cost_ins: f32,
    cost_del: f32,
    cost_sub: f32,
    norm: Norm,
}

impl Default for Levenshtein {
    fn default() -> Self {
        Self {
            cost_ins: 1.0,
            cost_del: 1.0,
            cost_sub: 1.0,
            norm: Norm::None,
        }
    }
}

impl Measure for Levenshtein {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        self.cost_ins = cfg.cost_ins;
        self.cost_del = cfg.cost_del;
        self.cost_sub = cfg.cost_sub;
        if cfg.cost_ins != cfg.cost_del {
            // Kept as configured, but triangular fills mirror one direction.
            warn!(
                target: "measures",
                cost_ins = cfg.cost_ins as f64,
                cost_del = cfg.cost_del as f64,
                "unequal_edit_costs_make_levenshtein_directional"
            );
        }
        self.norm = Norm::parse(&cfg.norm);
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let (la, lb) = (a.len(), b.len());
        // Single-row DP; row[j] holds dp[i][j] for the current i.
        let mut row: Vec<f32> = (0..=lb).map(|j| j as f32 * self.cost_ins).collect();
        for i in 1..=la {
            let mut diag = row[0];
            row[0] = i as f32 * self.cost_del;
            for j in 1..=lb {
                let up = row[j];
                let sub = diag
                    + if a.sym(i - 1) == b.sym(j - 1) {
                        0.0
                    } else {
                        self.cost_sub
                    };
                row[j] = sub.min(up + self.cost_del).min(row[j - 1] + self.cost_ins);
                diag = up;
            }
        }
        self.norm.apply(row[lb], la, lb)
    }
}

/// Damerau-Levenshtein distance (restricted form: adjacent transpositions,
/// no substring edited twice), with a separate transposition cost.
#[derive(Debug, Clone)]
pub struct Damerau {
    cost_ins: f32,
    cost_del: f32,
    cost_sub: f32,
    cost_tra: f32,
    norm: Norm,
}

impl Default for Damerau {
    fn default() -> Self {
        Self {
            cost_ins: 1.0,
            cost_del: 1.0,
            cost_sub: 1.0,
            cost_tra: 1.0,
            norm: Norm::None,
        }
    }
}

impl Measure for Damerau {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        self.cost_ins = cfg.cost_ins;
        self.cost_del = cfg.cost_del;
        self.cost_sub = cfg.cost_sub;
        self.cost_tra = cfg.cost_tra;
        if cfg.cost_ins != cfg.cost_del {
            warn!(
                target: "measures",
                cost_ins = cfg.cost_ins as f64,
                cost_del = cfg.cost_del as f64,
                "unequal_edit_costs_make_damerau_directional"
            );
        }
        self.norm = Norm::parse(&cfg.norm);
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let (la, lb) = (a.len(), b.len());
        // Three rolling rows: i-2, i-1, i.
        let mut prev2: Vec<f32> = vec![0.0; lb + 1];
        let mut prev: Vec<f32> = (0..=lb).map(|j| j as f32 * self.cost_ins).collect();
        let mut cur: Vec<f32> = vec![0.0; lb + 1];
        for i in 1..=la {
            cur[0] = i as f32 * self.cost_del;
            for j in 1..=lb {
                let sub = prev[j - 1]
                    + if a.sym(i - 1) == b.sym(j - 1) {
                        0.0
                    } else {
                        self.cost_sub
                    };
                let mut best = sub
                    .min(prev[j] + self.cost_del)
                    .min(cur[j - 1] + self.cost_ins);
                if i > 1
                    && j > 1
                    && a.sym(i - 1) == b.sym(j - 2)
                    && a.sym(i - 2) == b.sym(j - 1)
                {
                    best = best.min(prev2[j - 2] + self.cost_tra);
                }
                cur[j] = best;
            }
            std::mem::swap(&mut prev2, &mut prev);
            std::mem::swap(&mut prev, &mut cur);
        }
        self.norm.apply(prev[lb], la, lb)
    }
}

/// Hamming distance. Positions beyond the shorter value count as mismatches,
/// which keeps the measure total and symmetric over unequal lengths.
/// Normalization is `none` or `max` only.
#[derive(Debug, Clone, Default)]
pub struct Hamming {
    norm: Norm,
}

impl Measure for Hamming {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        self.norm = match cfg.norm.as_str() {
            "none" => Norm::None,
            "max" => Norm::Max,
            other => {
                warn!(
                    target: "measures",
                    norm = other,
                    "unsupported_hamming_norm_using_none"
                );
                Norm::None
            }
        };
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let (la, lb) = (a.len(), b.len());
        let common = la.min(lb);
        let mut d = la.abs_diff(lb);
        for i in 0..common {
            if a.sym(i) != b.sym(i) {
                d += 1;
            }
        }
        self.norm.apply(d as f32, la, lb)
    }
}

/// Bag distance: `max(|a \ b|, |b \ a|)` over multisets. A cheap lower
/// bound of Levenshtein; always raw, no normalization.
#[derive(Debug, Clone, Default)]
pub struct Bag;

impl Measure for Bag {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        if cfg.norm != "none" {
            warn!(
                target: "measures",
                norm = cfg.norm.as_str(),
                "bag_has_no_normalization_ignoring"
            );
        }
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let mut counts: AHashMap<u64, i64> = AHashMap::with_capacity(a.len().max(b.len()));
        for s in a.syms() {
            *counts.entry(s).or_insert(0) += 1;
        }
        for s in b.syms() {
            *counts.entry(s).or_insert(0) -= 1;
        }
        let (mut only_a, mut only_b) = (0i64, 0i64);
        for &v in counts.values() {
            if v > 0 {
                only_a += v;
            } else {
                only_b -= v;
            }
        }
        only_a.max(only_b) as f32
    }
}

/// Lee distance over the ring `Z_q`. Elements reduce modulo the alphabet
/// size; positions beyond the shorter value contribute the distance of the
/// lone symbol to zero, which keeps unequal lengths symmetric. Always raw,
/// no normalization.
#[derive(Debug, Clone)]
pub struct Lee {
    q: u64,
}

impl Default for Lee {
    fn default() -> Self {
        Self { q: 256 }
    }
}

impl Measure for Lee {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        if cfg.lee_alphabet < 2 {
            warn!(
                target: "measures",
                alphabet = cfg.lee_alphabet,
                "lee_alphabet_too_small_using_256"
            );
            self.q = 256;
        } else {
            self.q = cfg.lee_alphabet;
        }
        if cfg.norm != "none" {
            warn!(
                target: "measures",
                norm = cfg.norm.as_str(),
                "lee_has_no_normalization_ignoring"
            );
        }
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let q = self.q;
        let ring = |s: u64| s % q;
        let circ = |x: u64, y: u64| {
            let d = x.abs_diff(y);
            d.min(q - d)
        };
        let (la, lb) = (a.len(), b.len());
        let common = la.min(lb);
        let mut d = 0u64;
        for i in 0..common {
            d += circ(ring(a.sym(i)), ring(b.sym(i)));
        }
        let (longer, from) = if la > lb { (a, lb) } else { (b, la) };
        for i in from..longer.len() {
            d += circ(ring(longer.sym(i)), 0);
        }
        d as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured<M: Measure + Default>(norm: &str) -> M {
        let mut m = M::default();
        let mut cfg = MeasureConfig::default();
        cfg.norm = norm.to_string();
        m.configure(&cfg).unwrap();
        m
    }

    fn v(s: &str) -> StrValue {
        StrValue::from_str(s, 0.0, 0)
    }

    #[test]
    fn levenshtein_classic_pairs() {
        let m: Levenshtein = configured("none");
        assert_eq!(m.compare(&v("abc"), &v("abd")), 1.0);
        assert_eq!(m.compare(&v("abc"), &v("xyz")), 3.0);
        assert_eq!(m.compare(&v("kitten"), &v("sitting")), 3.0);
        assert_eq!(m.compare(&v(""), &v("abc")), 3.0);
        assert_eq!(m.compare(&v(""), &v("")), 0.0);
    }

    #[test]
    fn levenshtein_weighted_costs_are_directional() {
        let mut m = Levenshtein::default();
        let mut cfg = MeasureConfig::default();
        cfg.cost_ins = 2.0;
        cfg.cost_del = 1.0;
        m.configure(&cfg).unwrap();
        // "ab" -> "abc" needs one insert (2.0); the reverse one delete (1.0).
        assert_eq!(m.compare(&v("ab"), &v("abc")), 2.0);
        assert_eq!(m.compare(&v("abc"), &v("ab")), 1.0);
    }

    #[test]
    fn levenshtein_normalization_modes() {
        let m: Levenshtein = configured("max");
        assert_eq!(m.compare(&v("abc"), &v("xyz")), 1.0);
        let m: Levenshtein = configured("avg");
        assert_eq!(m.compare(&v(""), &v("ab")), 2.0);
        let m: Levenshtein = configured("min");
        // Degenerate: min length 0 yields 0, not NaN.
        assert_eq!(m.compare(&v(""), &v("ab")), 0.0);
    }

    #[test]
    fn unknown_norm_falls_back_to_none() {
        let m: Levenshtein = configured("fancy");
        assert_eq!(m.compare(&v("abc"), &v("xyz")), 3.0);
    }

    #[test]
    fn damerau_counts_transpositions() {
        let m: Damerau = configured("none");
        assert_eq!(m.compare(&v("ab"), &v("ba")), 1.0);
        assert_eq!(m.compare(&v("ca"), &v("abc")), 3.0); // restricted form
        let lev: Levenshtein = configured("none");
        assert_eq!(lev.compare(&v("ab"), &v("ba")), 2.0);
    }

    #[test]
    fn damerau_transposition_cost_is_separate() {
        let mut m = Damerau::default();
        let mut cfg = MeasureConfig::default();
        cfg.cost_tra = 0.5;
        m.configure(&cfg).unwrap();
        assert_eq!(m.compare(&v("ab"), &v("ba")), 0.5);
    }

    #[test]
    fn hamming_pads_length_excess() {
        let m: Hamming = configured("none");
        assert_eq!(m.compare(&v("karolin"), &v("kathrin")), 3.0);
        assert_eq!(m.compare(&v("abc"), &v("abcdef")), 3.0);
        assert_eq!(m.compare(&v(""), &v("")), 0.0);
        let m: Hamming = configured("max");
        assert_eq!(m.compare(&v("abc"), &v("abd")), 1.0 / 3.0);
    }

    #[test]
    fn hamming_accepts_only_none_and_max() {
        // min/avg are not part of the hamming contract; both reset to none.
        let m: Hamming = configured("min");
        assert_eq!(m.compare(&v("abc"), &v("abd")), 1.0);
        let m: Hamming = configured("avg");
        assert_eq!(m.compare(&v("abc"), &v("abcdef")), 3.0);
    }

    #[test]
    fn bag_is_multiset_difference() {
        let m: Bag = configured("none");
        assert_eq!(m.compare(&v("aabc"), &v("abcc")), 1.0);
        assert_eq!(m.compare(&v("abc"), &v("abc")), 0.0);
        assert_eq!(m.compare(&v("abcd"), &v("xy")), 4.0);
    }

    #[test]
    fn bag_and_lee_ignore_configured_norms() {
        // Neither measure carries a normalization mode; the raw value stays.
        let bag: Bag = configured("max");
        assert_eq!(bag.compare(&v("abcd"), &v("xy")), 4.0);
        let lee: Lee = configured("max");
        let a = StrValue::from_bytes(vec![5], 0.0, 0);
        let b = StrValue::from_bytes(vec![9], 0.0, 1);
        assert_eq!(lee.compare(&a, &b), 4.0);
    }

    #[test]
    fn lee_wraps_around_the_alphabet() {
        let mut m = Lee::default();
        let mut cfg = MeasureConfig::default();
        cfg.lee_alphabet = 6;
        m.configure(&cfg).unwrap();
        // Classic example over Z_6: d(0123, 3210) with symbols as bytes.
        let a = StrValue::from_bytes(vec![0, 1, 2, 3], 0.0, 0);
        let b = StrValue::from_bytes(vec![3, 2, 1, 0], 0.0, 1);
        // |0-3|->3, |1-2|->1, |2-1|->1, |3-0|->3
        assert_eq!(m.compare(&a, &b), 8.0);
    }

    #[test]
    fn lee_excess_measures_against_zero() {
        let mut m = Lee::default();
        let mut cfg = MeasureConfig::default();
        cfg.lee_alphabet = 256;
        m.configure(&cfg).unwrap();
        let a = StrValue::from_bytes(vec![1], 0.0, 0);
        let b = StrValue::from_bytes(vec![1, 250], 0.0, 1);
        // Excess byte 250 wraps: min(250, 6) = 6.
        assert_eq!(m.compare(&a, &b), 6.0);
        assert_eq!(m.compare(&b, &a), 6.0);
    }

    #[test]
    fn lee_rejects_degenerate_alphabet() {
        let mut m = Lee::default();
        let mut cfg = MeasureConfig::default();
        cfg.lee_alphabet = 0;
        m.configure(&cfg).unwrap();
        let a = StrValue::from_bytes(vec![5], 0.0, 0);
        let b = StrValue::from_bytes(vec![9], 0.0, 1);
        // Falls back to q = 256 instead of dividing by zero.
        assert_eq!(m.compare(&a, &b), 4.0);
    }
}
