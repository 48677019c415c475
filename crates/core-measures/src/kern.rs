//! Kernels over n-grams and gappy subsequences.
//!
//! Both kernels support `none` (raw value) and `sqrt` normalization
//! (`k(a,b) / sqrt(k(a,a) * k(b,b))`). Under `sqrt`, element-equal inputs
//! score exactly 1 and a degenerate self-kernel (input shorter than the
//! window) scores 0 against anything else.

use anyhow::Result;
use tracing::warn;

use core_config::MeasureConfig;
use core_strings::{StrValue, hash64};

use crate::Measure;

/// Kernel normalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernNorm {
    #[default]
    None,
    Sqrt,
}

impl KernNorm {
    pub fn parse(s: &str) -> Self {
        match s {
            "none" => KernNorm::None,
            "sqrt" => KernNorm::Sqrt,
            other => {
                warn!(target: "measures", norm = other, "unknown_kernel_norm_using_none");
                KernNorm::None
            }
        }
    }
}

/// Element-wise equality over the widened sequences.
fn equal_seq(a: &StrValue, b: &StrValue) -> bool {
    a.len() == b.len() && a.syms().zip(b.syms()).all(|(x, y)| x == y)
}

/// Orders a pair by content so symmetric callers run the exact same
/// floating-point computation regardless of argument order.
fn canon_pair<'v>(a: &'v StrValue, b: &'v StrValue) -> (&'v StrValue, &'v StrValue) {
    if a.len() != b.len() {
        if a.len() < b.len() { (a, b) } else { (b, a) }
    } else {
        for (x, y) in a.syms().zip(b.syms()) {
            if x != y {
                return if x < y { (a, b) } else { (b, a) };
            }
        }
        (a, b)
    }
}

/// Spectrum kernel: dot product of n-gram count profiles. n-grams are
/// fingerprinted through the stable 64-bit hash; profiles are kept sorted so
/// the merge-join accumulates in one deterministic order for both argument
/// orders.
#[derive(Debug, Clone)]
pub struct Spectrum {
    n: usize,
    norm: KernNorm,
}

impl Default for Spectrum {
    fn default() -> Self {
        Self {
            n: 3,
            norm: KernNorm::None,
        }
    }
}

impl Spectrum {
    /// Sorted (n-gram fingerprint, count) profile.
    fn profile(&self, v: &StrValue) -> Vec<(u64, u64)> {
        let len = v.len();
        if len < self.n {
            return Vec::new();
        }
        let mut grams: Vec<u64> = Vec::with_capacity(len - self.n + 1);
        let mut buf = Vec::with_capacity(self.n * 8);
        for start in 0..=(len - self.n) {
            buf.clear();
            for i in start..start + self.n {
                buf.extend_from_slice(&v.sym(i).to_le_bytes());
            }
            grams.push(hash64(&buf));
        }
        grams.sort_unstable();
        let mut profile: Vec<(u64, u64)> = Vec::with_capacity(grams.len());
        for g in grams {
            match profile.last_mut() {
                Some((last, count)) if *last == g => *count += 1,
                _ => profile.push((g, 1)),
            }
        }
        profile
    }

    fn dot(xs: &[(u64, u64)], ys: &[(u64, u64)]) -> f64 {
        let mut k = 0.0f64;
        let (mut i, mut j) = (0usize, 0usize);
        while i < xs.len() && j < ys.len() {
            match xs[i].0.cmp(&ys[j].0) {
                std::cmp::Ordering::Equal => {
                    k += (xs[i].1 * ys[j].1) as f64;
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        k
    }
}

impl Measure for Spectrum {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        if cfg.ngram_len == 0 {
            warn!(target: "measures", "ngram_len_zero_using_default");
            self.n = 3;
        } else {
            self.n = cfg.ngram_len;
        }
        self.norm = KernNorm::parse(&cfg.norm);
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let pa = self.profile(a);
        let pb = self.profile(b);
        let kab = Self::dot(&pa, &pb);
        match self.norm {
            KernNorm::None => kab as f32,
            KernNorm::Sqrt => {
                if equal_seq(a, b) {
                    return 1.0;
                }
                let kaa = Self::dot(&pa, &pa);
                let kbb = Self::dot(&pb, &pb);
                if kaa == 0.0 || kbb == 0.0 {
                    0.0
                } else {
                    (kab / (kaa * kbb).sqrt()) as f32
                }
            }
        }
    }
}

/// Subsequence kernel (gap-weighted, fixed length `p`, decay `lambda`).
/// Standard cubic dynamic program; the pair is canonicalized first so the
/// accumulation order is identical for both argument orders.
#[derive(Debug, Clone)]
pub struct Subsequence {
    p: usize,
    lambda: f64,
    norm: KernNorm,
}

impl Default for Subsequence {
    fn default() -> Self {
        Self {
            p: 2,
            lambda: 0.5,
            norm: KernNorm::None,
        }
    }
}

impl Subsequence {
    fn kernel(&self, s: &StrValue, t: &StrValue) -> f64 {
        let (ls, lt) = (s.len(), t.len());
        if ls < self.p || lt < self.p {
            return 0.0;
        }
        let lam = self.lambda;
        // kp[i][j] = K'_{l}(s[..i], t[..j]); level 0 is all-ones.
        let mut kp = vec![vec![1.0f64; lt + 1]; ls + 1];
        for l in 1..self.p {
            let mut next = vec![vec![0.0f64; lt + 1]; ls + 1];
            for i in l..=ls {
                // kpp accumulates K''_l(i, j) along j.
                let mut kpp = 0.0f64;
                for j in l..=lt {
                    kpp = lam * kpp
                        + if s.sym(i - 1) == t.sym(j - 1) {
                            lam * lam * kp[i - 1][j - 1]
                        } else {
                            0.0
                        };
                    next[i][j] = lam * next[i - 1][j] + kpp;
                }
            }
            kp = next;
        }
        let mut k = 0.0f64;
        for i in self.p..=ls {
            for j in self.p..=lt {
                if s.sym(i - 1) == t.sym(j - 1) {
                    k += lam * lam * kp[i - 1][j - 1];
                }
            }
        }
        k
    }
}

impl Measure for Subsequence {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        if cfg.ssk_len == 0 {
            warn!(target: "measures", "ssk_len_zero_using_default");
            self.p = 2;
        } else {
            self.p = cfg.ssk_len;
        }
        if cfg.ssk_decay <= 0.0 || cfg.ssk_decay > 1.0 {
            warn!(
                target: "measures",
                decay = cfg.ssk_decay,
                "ssk_decay_out_of_range_using_default"
            );
            self.lambda = 0.5;
        } else {
            self.lambda = cfg.ssk_decay;
        }
        self.norm = KernNorm::parse(&cfg.norm);
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let (s, t) = canon_pair(a, b);
        let kab = self.kernel(s, t);
        match self.norm {
            KernNorm::None => kab as f32,
            KernNorm::Sqrt => {
                if equal_seq(a, b) {
                    return 1.0;
                }
                let kaa = self.kernel(s, s);
                let kbb = self.kernel(t, t);
                if kaa == 0.0 || kbb == 0.0 {
                    0.0
                } else {
                    (kab / (kaa * kbb).sqrt()) as f32
                }
            }
        }
    }
}
