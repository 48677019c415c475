//! Measure interface, dispatch and the measure catalog.
//!
//! A measure is a `(configure, compare)` pair: `configure` binds parameters
//! from the shared `[measure]` configuration once, before any comparison;
//! `compare` maps two string values to one `f32` and must be pure and
//! thread-safe so the matrix driver can fan it out across cells.
//!
//! Registration is a static name → factory table. Unknown names warn and
//! fall back to [`DEFAULT_MEASURE`] per the configuration error policy.
//!
//! Symmetry: every measure here is mathematically symmetric and returns
//! bit-exactly equal scores for swapped arguments, with one documented
//! exception: the Levenshtein family under unequal insert/delete costs is
//! directional (`compare(a, b)` is the cost of editing `a` into `b`).

use anyhow::Result;
use tracing::warn;

use core_config::MeasureConfig;
use core_strings::StrValue;

pub mod coeff;
pub mod dist;
pub mod jaro;
pub mod kern;
pub mod triple;

pub use coeff::{Coefficient, CoeffKind};
pub use dist::{Bag, Damerau, Hamming, Lee, Levenshtein, Norm};
pub use jaro::{Jaro, JaroWinkler};
pub use kern::{KernNorm, Spectrum, Subsequence};
pub use triple::{MatchTriple, match_triple};

/// Measure used when the configured name is unknown.
pub const DEFAULT_MEASURE: &str = "dist_levenshtein";

pub trait Measure: Send + Sync {
    /// Binds algorithm parameters from shared configuration. Called once
    /// after configuration loading and before any `compare`. Out-of-domain
    /// parameters warn and reset to their defaults rather than failing.
    fn configure(&mut self, cfg: &MeasureConfig) -> Result<()>;

    /// Compares two string values. Pure and thread-safe; NaN and infinities
    /// are legal return values and stored verbatim by the driver.
    fn compare(&self, a: &StrValue, b: &StrValue) -> f32;
}

type Factory = fn() -> Box<dyn Measure>;

static REGISTRY: &[(&str, Factory)] = &[
    ("dist_levenshtein", || Box::new(Levenshtein::default())),
    ("dist_damerau", || Box::new(Damerau::default())),
    ("dist_hamming", || Box::new(Hamming::default())),
    ("dist_bag", || Box::new(Bag::default())),
    ("dist_lee", || Box::new(Lee::default())),
    ("dist_jaro", || Box::new(Jaro::default())),
    ("dist_jarowinkler", || Box::new(JaroWinkler::default())),
    ("sim_jaccard", || Box::new(Coefficient::new(CoeffKind::Jaccard))),
    ("sim_dice", || Box::new(Coefficient::new(CoeffKind::Dice))),
    ("sim_simpson", || Box::new(Coefficient::new(CoeffKind::Simpson))),
    ("sim_braunblanquet", || {
        Box::new(Coefficient::new(CoeffKind::BraunBlanquet))
    }),
    ("sim_kulczynski", || {
        Box::new(Coefficient::new(CoeffKind::Kulczynski))
    }),
    ("sim_sokalsneath", || {
        Box::new(Coefficient::new(CoeffKind::SokalSneath))
    }),
    ("sim_otsuka", || Box::new(Coefficient::new(CoeffKind::Otsuka))),
    ("kern_spectrum", || Box::new(Spectrum::default())),
    ("kern_subsequence", || Box::new(Subsequence::default())),
];

/// Exact-name lookup.
pub fn lookup(name: &str) -> Option<Box<dyn Measure>> {
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factory)| factory())
}

/// Resolves a measure by name, warning and falling back to the default for
/// unknown names.
pub fn resolve(name: &str) -> Box<dyn Measure> {
    lookup(name).unwrap_or_else(|| {
        warn!(
            target: "measures",
            name,
            fallback = DEFAULT_MEASURE,
            "unknown_measure_using_default"
        );
        lookup(DEFAULT_MEASURE).expect("default measure is registered")
    })
}

/// Registered measure names, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(n, _)| *n)
}
