//! Application constants.
//!
//! Centralizes magic numbers and default experiment values.

/// Gram extraction constants.
pub mod grams {
    /// Separator joining the tokens of a bigram..five-gram.
    pub const SEPARATOR: &str = "|";

    /// Highest n-gram order extracted from a lyric line.
    pub const MAX_ORDER: usize = 5;

    /// Lines of this many characters or fewer are skipped.
    pub const MIN_LINE_LEN: usize = 1;

    /// Separator between artist and title in lyrics file names.
    pub const NAME_SEPARATOR: char = '~';
}

/// Feature selection defaults.
pub mod selection {
    /// Grams must occur at least this often in training to be selected.
    pub const NOISE_FLOOR: usize = 2;

    /// Default unigram vocabulary cap.
    pub const DEFAULT_UNIGRAM_CAP: usize = 1000;

    /// Default bigram vocabulary cap.
    pub const DEFAULT_BIGRAM_CAP: usize = 500;

    /// Default trigram vocabulary cap.
    pub const DEFAULT_TRIGRAM_CAP: usize = 250;

    /// Default four-gram vocabulary cap.
    pub const DEFAULT_FOUR_GRAM_CAP: usize = 100;

    /// Default five-gram vocabulary cap.
    pub const DEFAULT_FIVE_GRAM_CAP: usize = 100;
}

/// Experiment defaults.
pub mod experiment {
    /// Default fraction of the shuffled corpus used for training.
    pub const DEFAULT_SPLIT: f64 = 0.7;

    /// Default number of repeated iterations.
    pub const DEFAULT_ITERATIONS: usize = 1;

    /// Default additive smoothing constant.
    pub const DEFAULT_SMOOTHING: f64 = 1.0;

    /// Default number of informative features listed in reports.
    pub const DEFAULT_SHOW_FEATURES: usize = 10;
}

/// Structural tag categories counted by the meta feature.
pub mod structure {
    /// Canonical categories, matched by substring against tag content.
    pub const CATEGORIES: &[&str] = &[
        "verse",
        "chorus",
        "intro",
        "outro",
        "bridge",
        "hook",
        "interlude",
        "break",
        "breakdown",
        "skit",
        "drop",
        "pre-chorus",
    ];

    /// Tag synonyms folded into a canonical category.
    pub const SYNONYMS: &[(&str, &str)] = &[("refrain", "chorus")];
}
