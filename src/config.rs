//! Application configuration.
//!
//! `Config` handles locating the corpus from environment variables and .env files.
//! `ExperimentConfig` and `FeatureConfig` are the plain values the pipeline consumes;
//! they are built once at startup and passed explicitly.

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::constants::{experiment, selection};
use crate::error::{Error, Result};
use crate::types::GramOrder;

/// Configuration for locating the corpus.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Directory holding one lyrics file per song
    pub lyrics_dir: PathBuf,
    /// Project file listing `[artist, title, genre]` entries
    pub project_file: Option<PathBuf>,
    /// Base seed for shuffling
    pub seed: u64,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            lyrics_dir: PathBuf::from("lyrics"),
            project_file: None,
            seed: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(dir) = env::var("LYRICS_DIR") {
            config.lyrics_dir = expand_path(&dir);
        }

        if let Ok(file) = env::var("LYRICS_PROJECT_FILE") {
            config.project_file = Some(expand_path(&file));
        }

        if let Ok(seed) = env::var("LYRICS_SEED") {
            config.seed = seed.parse::<u64>().map_err(|_| {
                Error::config(
                    format!("LYRICS_SEED={seed} is not an unsigned integer"),
                    "Set LYRICS_SEED to a non-negative whole number",
                )
            })?;
        }

        Ok(config)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Selection settings for one n-gram order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Whether grams of this order become features.
    pub enabled: bool,
    /// Maximum vocabulary size.
    pub cap: usize,
    /// Minimum training frequency; never below the noise floor.
    pub min_count: usize,
}

impl OrderConfig {
    /// Enabled order with the given cap and the default frequency floor.
    pub const fn enabled(cap: usize) -> Self {
        Self { enabled: true, cap, min_count: selection::NOISE_FLOOR }
    }

    /// Disabled order with the given cap.
    pub const fn disabled(cap: usize) -> Self {
        Self { enabled: false, cap, min_count: selection::NOISE_FLOOR }
    }

    /// Frequency a gram needs to be selected.
    pub fn effective_min_count(&self) -> usize {
        self.min_count.max(selection::NOISE_FLOOR)
    }
}

/// Feature extraction switches and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Per-order settings indexed by [`GramOrder::index`].
    pub orders: [OrderConfig; 5],
    /// Emit structural tag counts.
    pub meta: bool,
    /// Drop stopword and punctuation unigrams from the vocabulary.
    pub stopwords: bool,
    /// Tokenize unigrams with the word/punctuation tokenizer.
    pub tokenize: bool,
    /// Stem unigrams.
    pub stem: bool,
    /// Character count threshold; disabled when not positive.
    pub max_chars: i64,
    /// Word count threshold; disabled when not positive.
    pub max_words: i64,
    /// Unique word count threshold; disabled when not positive.
    pub max_unique: i64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            orders: [
                OrderConfig::enabled(selection::DEFAULT_UNIGRAM_CAP),
                OrderConfig::disabled(selection::DEFAULT_BIGRAM_CAP),
                OrderConfig::disabled(selection::DEFAULT_TRIGRAM_CAP),
                OrderConfig::disabled(selection::DEFAULT_FOUR_GRAM_CAP),
                OrderConfig::disabled(selection::DEFAULT_FIVE_GRAM_CAP),
            ],
            meta: false,
            stopwords: false,
            tokenize: false,
            stem: false,
            max_chars: -1,
            max_words: -1,
            max_unique: -1,
        }
    }
}

impl FeatureConfig {
    /// Settings for one order. Unigrams are always enabled.
    pub fn order(&self, order: GramOrder) -> OrderConfig {
        let mut cfg = self.orders[order.index()];
        if order == GramOrder::Unigram {
            cfg.enabled = true;
        }
        cfg
    }

    /// Mutable settings for one order.
    pub fn order_mut(&mut self, order: GramOrder) -> &mut OrderConfig {
        &mut self.orders[order.index()]
    }

    /// Orders that contribute features, lowest first.
    pub fn enabled_orders(&self) -> Vec<GramOrder> {
        GramOrder::all()
            .iter()
            .copied()
            .filter(|o| self.order(*o).enabled)
            .collect()
    }

    /// Threshold if positive.
    pub fn threshold(value: i64) -> Option<usize> {
        usize::try_from(value).ok().filter(|v| *v > 0)
    }
}

/// Values for one experiment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Fraction of the shuffled corpus used for training.
    pub split: f64,
    /// Number of repeated shuffles to average over.
    pub iterations: usize,
    /// Base seed; iteration `i` shuffles with `seed + i`.
    pub seed: u64,
    /// Run iterations on the rayon thread pool.
    pub parallel: bool,
    /// Additive smoothing constant for conditional probabilities.
    pub smoothing: f64,
    /// Most informative features kept per iteration.
    pub show_features: usize,
    /// Feature extraction settings.
    pub features: FeatureConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            split: experiment::DEFAULT_SPLIT,
            iterations: experiment::DEFAULT_ITERATIONS,
            seed: 0,
            parallel: false,
            smoothing: experiment::DEFAULT_SMOOTHING,
            show_features: experiment::DEFAULT_SHOW_FEATURES,
            features: FeatureConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.split) {
            return Err(Error::config(
                format!("Split fraction {} is outside [0, 1]", self.split),
                "Use a training percentage between 0 and 100",
            ));
        }
        if self.iterations == 0 {
            return Err(Error::config(
                "Iteration count is zero",
                "Run at least one iteration",
            ));
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(Error::config(
                format!("Smoothing constant {} is not positive", self.smoothing),
                "Use a positive additive smoothing constant such as 1.0",
            ));
        }
        Ok(())
    }

    /// Seed used by the given iteration.
    pub const fn iteration_seed(&self, iteration: usize) -> u64 {
        self.seed.wrapping_add(iteration as u64)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_experiment_is_valid() {
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn split_outside_unit_interval_is_rejected() {
        let mut cfg = ExperimentConfig { split: 1.2, ..ExperimentConfig::default() };
        assert!(cfg.validate().unwrap_err().is_fatal_config());
        cfg.split = -0.1;
        assert!(cfg.validate().is_err());
        cfg.split = 0.0;
        assert!(cfg.validate().is_ok());
        cfg.split = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let cfg = ExperimentConfig { iterations: 0, ..ExperimentConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unigram_is_always_enabled() {
        let mut features = FeatureConfig::default();
        features.order_mut(GramOrder::Unigram).enabled = false;
        features.order_mut(GramOrder::Trigram).enabled = true;
        assert_eq!(features.enabled_orders(), vec![GramOrder::Unigram, GramOrder::Trigram]);
    }

    #[test]
    fn min_count_never_below_noise_floor() {
        let cfg = OrderConfig { enabled: true, cap: 10, min_count: 0 };
        assert_eq!(cfg.effective_min_count(), 2);
        let cfg = OrderConfig { enabled: true, cap: 10, min_count: 5 };
        assert_eq!(cfg.effective_min_count(), 5);
    }

    #[test]
    fn thresholds_enabled_by_sign() {
        assert_eq!(FeatureConfig::threshold(-1), None);
        assert_eq!(FeatureConfig::threshold(0), None);
        assert_eq!(FeatureConfig::threshold(300), Some(300));
    }
}
