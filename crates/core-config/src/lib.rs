//! Configuration loading and parsing.
//!
//! Parses `simatrix.toml` (or an override path provided by the binary) into
//! typed sections with per-field defaults. Unknown fields are ignored (TOML
//! deserialization tolerance) so the file format can evolve without
//! immediate warnings. Policy follows the engine's error table: a missing or
//! unparsable file falls back to defaults with a warning, never an abort.
//!
//! The `[measure]` section is the flat name→value map measures query during
//! `configure`; the remaining sections are consumed by the binary when wiring
//! ranges, tokenization and output.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

/// Default configuration file name, discovered in the working directory.
pub const CONFIG_FILE_NAME: &str = "simatrix.toml";

/// Measure selection and per-measure parameters.
///
/// Every measure reads the subset it understands during `configure`; the
/// rest is ignored. Defaults reproduce plain unit-cost Levenshtein.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Registered measure name, e.g. `dist_levenshtein` or `sim_jaccard`.
    #[serde(default = "MeasureConfig::default_name")]
    pub name: String,

    /// Edit costs for the Levenshtein family.
    #[serde(default = "MeasureConfig::default_cost")]
    pub cost_ins: f32,
    #[serde(default = "MeasureConfig::default_cost")]
    pub cost_del: f32,
    #[serde(default = "MeasureConfig::default_cost")]
    pub cost_sub: f32,
    /// Transposition cost (Damerau only).
    #[serde(default = "MeasureConfig::default_cost")]
    pub cost_tra: f32,

    /// Normalization mode: `none|min|max|avg` for distances, `none|sqrt`
    /// for kernels. Unknown values warn and fall back to `none`.
    #[serde(default = "MeasureConfig::default_norm")]
    pub norm: String,

    /// n-gram length for the spectrum kernel.
    #[serde(default = "MeasureConfig::default_ngram_len")]
    pub ngram_len: usize,

    /// Subsequence kernel: subsequence length and gap decay.
    #[serde(default = "MeasureConfig::default_ssk_len")]
    pub ssk_len: usize,
    #[serde(default = "MeasureConfig::default_ssk_decay")]
    pub ssk_decay: f64,

    /// Alphabet size for the Lee distance.
    #[serde(default = "MeasureConfig::default_lee_alphabet")]
    pub lee_alphabet: u64,

    /// Jaro-Winkler prefix scale.
    #[serde(default = "MeasureConfig::default_jw_scale")]
    pub jw_scale: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            cost_ins: Self::default_cost(),
            cost_del: Self::default_cost(),
            cost_sub: Self::default_cost(),
            cost_tra: Self::default_cost(),
            norm: Self::default_norm(),
            ngram_len: Self::default_ngram_len(),
            ssk_len: Self::default_ssk_len(),
            ssk_decay: Self::default_ssk_decay(),
            lee_alphabet: Self::default_lee_alphabet(),
            jw_scale: Self::default_jw_scale(),
        }
    }
}

impl MeasureConfig {
    fn default_name() -> String {
        "dist_levenshtein".to_string()
    }
    const fn default_cost() -> f32 {
        1.0
    }
    fn default_norm() -> String {
        "none".to_string()
    }
    const fn default_ngram_len() -> usize {
        3
    }
    const fn default_ssk_len() -> usize {
        2
    }
    const fn default_ssk_decay() -> f64 {
        0.5
    }
    const fn default_lee_alphabet() -> u64 {
        256
    }
    const fn default_jw_scale() -> f64 {
        0.1
    }
}

/// Tokenization settings.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct TokenizeConfig {
    /// Delimiter specification (`%HH` escapes allowed). Empty keeps strings
    /// byte-level.
    #[serde(default)]
    pub delimiters: String,
}

/// Sub-range and split selection for distributed runs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RangesConfig {
    #[serde(default = "RangesConfig::default_range")]
    pub x: String,
    #[serde(default = "RangesConfig::default_range")]
    pub y: String,
    /// `B:k` block shard of the y-range; empty disables splitting.
    #[serde(default)]
    pub split: String,
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            x: Self::default_range(),
            y: Self::default_range(),
            split: String::new(),
        }
    }
}

impl RangesConfig {
    fn default_range() -> String {
        ":".to_string()
    }
}

/// Output format settings consumed by the writers.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// `text` or `libsvm`. Unknown formats warn and fall back to `text`.
    #[serde(default = "OutputConfig::default_format")]
    pub format: String,
    #[serde(default = "OutputConfig::default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
            precision: Self::default_precision(),
        }
    }
}

impl OutputConfig {
    fn default_format() -> String {
        "text".to_string()
    }
    const fn default_precision() -> usize {
        6
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub measure: MeasureConfig,
    #[serde(default)]
    pub tokenize: TokenizeConfig,
    #[serde(default)]
    pub ranges: RangesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Config path discovery: the working directory only. The tool is typically
/// run per-dataset, next to its inputs.
pub fn discover() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Loads configuration from `path`, or from the discovered location when
/// `None`. A missing file yields defaults silently; an unparsable file warns
/// and yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "config_parse_failed_using_defaults"
                );
                Ok(Config::default())
            }
        },
        Err(e) => {
            if explicit {
                warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "config_read_failed_using_defaults"
                );
            }
            Ok(Config::default())
        }
    }
}
