//! Jaro and Jaro-Winkler, registered as distances (`1 - similarity`).

use anyhow::Result;
use tracing::warn;

use core_config::MeasureConfig;
use core_strings::StrValue;

use crate::Measure;

/// Winkler prefix bonus saturates at this many leading matches.
const PREFIX_CAP: usize = 4;

/// Jaro similarity. Matches within the usual window
/// `max(la, lb)/2 - 1`; two empty values count as identical.
fn jaro_sim(a: &StrValue, b: &StrValue) -> f64 {
    let (la, lb) = (a.len(), b.len());
    if la == 0 && lb == 0 {
        return 1.0;
    }
    if la == 0 || lb == 0 {
        return 0.0;
    }
    let window = (la.max(lb) / 2).saturating_sub(1);

    let mut a_matched = vec![false; la];
    let mut b_matched = vec![false; lb];
    let mut matches = 0usize;
    for i in 0..la {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(lb);
        for j in lo..hi {
            if !b_matched[j] && a.sym(i) == b.sym(j) {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    // Half-transpositions between the matched subsequences.
    let mut half_transpositions = 0usize;
    let mut j = 0usize;
    for i in 0..la {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[j] {
            j += 1;
        }
        if a.sym(i) != b.sym(j) {
            half_transpositions += 1;
        }
        j += 1;
    }
    let m = matches as f64;
    let t = (half_transpositions / 2) as f64;
    (m / la as f64 + m / lb as f64 + (m - t) / m) / 3.0
}

/// Jaro distance, `1 - jaro_sim`.
#[derive(Debug, Clone, Default)]
pub struct Jaro;

impl Measure for Jaro {
    fn configure(&mut self, _cfg: &MeasureConfig) -> Result<()> {
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        (1.0 - jaro_sim(a, b)) as f32
    }
}

/// Jaro-Winkler distance: the Jaro score boosted by a shared prefix of up
/// to four elements, then inverted.
#[derive(Debug, Clone)]
pub struct JaroWinkler {
    scale: f64,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self { scale: 0.1 }
    }
}

impl Measure for JaroWinkler {
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()> {
        // scale * PREFIX_CAP must stay <= 1 or the similarity leaves [0,1].
        if !(0.0..=0.25).contains(&cfg.jw_scale) {
            warn!(
                target: "measures",
                scale = cfg.jw_scale,
                "jw_scale_out_of_range_using_default"
            );
            self.scale = 0.1;
        } else {
            self.scale = cfg.jw_scale;
        }
        Ok(())
    }

    fn compare(&self, a: &StrValue, b: &StrValue) -> f32 {
        let jaro = jaro_sim(a, b);
        let prefix = (0..a.len().min(b.len()).min(PREFIX_CAP))
            .take_while(|&i| a.sym(i) == b.sym(i))
            .count();
        let jw = jaro + prefix as f64 * self.scale * (1.0 - jaro);
        (1.0 - jw) as f32
    }
}
