//! Unigram tokenization and stemming.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::config::FeatureConfig;

/// Alphanumeric runs or punctuation runs.
#[allow(clippy::expect_used)]
static RE_WORDPUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+|[^\w\s]+").expect("valid regex: RE_WORDPUNCT")
});

/// Split text into word and punctuation tokens (`"don't"` becomes `don`, `'`, `t`).
pub fn wordpunct(text: &str) -> impl Iterator<Item = &str> {
    RE_WORDPUNCT.find_iter(text).map(|m| m.as_str())
}

/// Turns concatenated lyric text into the unigram stream.
///
/// Built once per experiment from the feature switches and shared by reference.
pub struct TextProcessor {
    tokenize: bool,
    stemmer: Option<Stemmer>,
}

impl fmt::Debug for TextProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextProcessor")
            .field("tokenize", &self.tokenize)
            .field("stem", &self.stemmer.is_some())
            .finish()
    }
}

impl TextProcessor {
    /// Processor for the given feature switches.
    pub fn new(features: &FeatureConfig) -> Self {
        Self {
            tokenize: features.tokenize,
            stemmer: features.stem.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    /// Processor that splits on spaces and keeps tokens as-is.
    pub const fn plain() -> Self {
        Self { tokenize: false, stemmer: None }
    }

    /// Unigram tokens of `text`, in order of appearance.
    pub fn unigrams(&self, text: &str) -> Vec<String> {
        let tokens: Vec<&str> = if self.tokenize {
            wordpunct(text).collect()
        } else {
            text.split_whitespace().collect()
        };

        match &self.stemmer {
            // Snowball expects lowercase input
            Some(stemmer) => tokens
                .into_iter()
                .map(|t| stemmer.stem(&t.to_lowercase()).into_owned())
                .collect(),
            None => tokens.into_iter().map(String::from).collect(),
        }
    }
}
