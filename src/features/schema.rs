//! Feature keys, values and the frozen schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::constants::structure::CATEGORIES;
use crate::features::selector::Vocabularies;
use crate::types::GramOrder;

/// Length measure compared against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthMetric {
    /// Characters in the raw lyrics.
    Chars,
    /// Word/punctuation tokens.
    Words,
    /// Distinct word/punctuation tokens.
    UniqueWords,
}

impl LengthMetric {
    /// Short name used in feature keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chars => "chars",
            Self::Words => "words",
            Self::UniqueWords => "unique",
        }
    }
}

/// Name of one feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    /// Presence of a vocabulary gram.
    Gram {
        /// N-gram order.
        order: GramOrder,
        /// Gram text, tokens joined by `|`.
        gram: String,
    },
    /// Count of a structural tag category.
    Structure(&'static str),
    /// Whether a length measure is at or under a threshold.
    Length {
        /// Measure compared.
        metric: LengthMetric,
        /// Inclusive upper bound.
        threshold: usize,
    },
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gram { order, gram } => write!(f, "{order}({gram})"),
            Self::Structure(category) => write!(f, "meta({category})"),
            Self::Length { metric, threshold } => write!(f, "{}<=({threshold})", metric.name()),
        }
    }
}

/// Value of one feature for one song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureValue {
    /// Boolean feature.
    Flag(bool),
    /// Count feature.
    Count(u32),
}

impl FeatureValue {
    /// The zero of this value's kind: `false` or `0`.
    pub const fn zero(self) -> Self {
        match self {
            Self::Flag(_) => Self::Flag(false),
            Self::Count(_) => Self::Count(0),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Count(c) => write!(f, "{c}"),
        }
    }
}

/// Ordered feature keys, fixed once vocabularies are frozen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    keys: Vec<FeatureKey>,
}

impl FeatureSchema {
    /// Schema for frozen vocabularies and feature switches.
    ///
    /// Order: grams by order then rank, structural categories, length thresholds.
    pub fn new(vocabularies: &Vocabularies, features: &FeatureConfig) -> Self {
        let mut keys = Vec::new();

        for (order, vocabulary) in vocabularies.iter() {
            keys.extend(vocabulary.grams().iter().map(|gram| FeatureKey::Gram {
                order,
                gram: gram.clone(),
            }));
        }

        if features.meta {
            keys.extend(CATEGORIES.iter().copied().map(FeatureKey::Structure));
        }

        let lengths = [
            (LengthMetric::Chars, features.max_chars),
            (LengthMetric::Words, features.max_words),
            (LengthMetric::UniqueWords, features.max_unique),
        ];
        for (metric, value) in lengths {
            if let Some(threshold) = FeatureConfig::threshold(value) {
                keys.push(FeatureKey::Length { metric, threshold });
            }
        }

        Self { keys }
    }

    /// Keys in vector order.
    pub fn keys(&self) -> &[FeatureKey] {
        &self.keys
    }

    /// Key at a vector position.
    pub fn key(&self, index: usize) -> Option<&FeatureKey> {
        self.keys.get(index)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when there are no features.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Feature values of one song, positioned by a [`FeatureSchema`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    /// Vector from values in schema order.
    pub const fn new(values: Vec<FeatureValue>) -> Self {
        Self { values }
    }

    /// Vector with no values; every feature reads as missing.
    pub const fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// Value at a schema position.
    pub fn get(&self, index: usize) -> Option<FeatureValue> {
        self.values.get(index).copied()
    }

    /// Values in schema order.
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the vector holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Named view of the vector, keyed by the schema's display names.
    pub fn to_map(&self, schema: &FeatureSchema) -> BTreeMap<String, FeatureValue> {
        schema
            .keys()
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}
