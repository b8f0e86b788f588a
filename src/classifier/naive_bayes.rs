//! Naive Bayes over discrete feature values.
//!
//! For each feature and label the conditional distribution over values uses
//! additive smoothing:
//!
//! ```text
//! P(v | f, label) = (count(f = v, label) + alpha) / (n_label + alpha * bins_f)
//! ```
//!
//! where `bins_f` is the number of values of `f` seen anywhere in training plus
//! one extra bin shared by every unseen value. Scores are log-prior plus summed
//! log-conditionals; equal scores resolve to the lexically smallest label.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classifier::{Estimator, LabeledVector, Model};
use crate::constants::experiment::DEFAULT_SMOOTHING;
use crate::error::{Error, Result};
use crate::features::{FeatureValue, FeatureVector};
use crate::types::Genre;

/// Naive Bayes estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaiveBayes {
    /// Additive smoothing constant.
    pub smoothing: f64,
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self { smoothing: DEFAULT_SMOOTHING }
    }
}

impl NaiveBayes {
    /// Estimator with the given smoothing constant.
    pub const fn new(smoothing: f64) -> Self {
        Self { smoothing }
    }
}

/// Conditional distributions of one feature.
#[derive(Debug, Clone, PartialEq)]
struct FeatureDistribution {
    /// Value assumed when a vector lacks this feature.
    missing: FeatureValue,
    /// Values seen in training, sorted.
    values: Vec<FeatureValue>,
    /// `[label][value]` log-probabilities.
    log_probs: Vec<Vec<f64>>,
    /// `[label]` log-probability of any unseen value.
    log_unseen: Vec<f64>,
}

impl FeatureDistribution {
    fn log_prob(&self, label: usize, value: FeatureValue) -> f64 {
        self.values
            .binary_search(&value)
            .map_or(self.log_unseen[label], |idx| self.log_probs[label][idx])
    }

    fn prob(&self, label: usize, value: FeatureValue) -> f64 {
        self.log_prob(label, value).exp()
    }
}

/// Trained Naive Bayes parameters. Never mutated after training.
#[derive(Debug, Clone, PartialEq)]
pub struct NaiveBayesModel {
    labels: Vec<Genre>,
    log_priors: Vec<f64>,
    features: Vec<FeatureDistribution>,
}

/// A feature value whose likelihood differs most across labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformativeFeature {
    /// Schema position of the feature.
    pub index: usize,
    /// The value compared.
    pub value: FeatureValue,
    /// Label under which the value is most likely.
    pub favored: Genre,
    /// Label under which the value is least likely.
    pub disfavored: Genre,
    /// Ratio of the two probabilities.
    pub ratio: f64,
}

impl Estimator for NaiveBayes {
    type Model = NaiveBayesModel;

    fn train(&self, examples: &[LabeledVector]) -> Result<NaiveBayesModel> {
        if examples.is_empty() {
            return Err(Error::config(
                "Training set is empty",
                "Use a larger corpus or a higher training percentage",
            ));
        }

        let mut label_counts: BTreeMap<&Genre, usize> = BTreeMap::new();
        for (_, genre) in examples {
            *label_counts.entry(genre).or_insert(0) += 1;
        }
        let labels: Vec<Genre> = label_counts.keys().map(|g| (*g).clone()).collect();
        let label_index: BTreeMap<&Genre, usize> =
            label_counts.keys().enumerate().map(|(i, g)| (*g, i)).collect();
        let per_label: Vec<usize> = label_counts.values().copied().collect();

        let total = examples.len() as f64;
        let log_priors = per_label.iter().map(|c| (*c as f64 / total).ln()).collect();

        let dimension = examples.iter().map(|(v, _)| v.len()).max().unwrap_or(0);
        let mut features = Vec::with_capacity(dimension);

        for feature in 0..dimension {
            // value -> per-label counts
            let mut counts: BTreeMap<FeatureValue, Vec<usize>> = BTreeMap::new();
            let missing = examples
                .iter()
                .find_map(|(vector, _)| vector.get(feature))
                .map_or(FeatureValue::Flag(false), FeatureValue::zero);
            for (vector, genre) in examples {
                let label = label_index[genre];
                let value = vector.get(feature).unwrap_or(missing);
                counts.entry(value).or_insert_with(|| vec![0; labels.len()])[label] += 1;
            }

            let bins = (counts.len() + 1) as f64;
            let mut log_probs = vec![Vec::with_capacity(counts.len()); labels.len()];
            let mut log_unseen = Vec::with_capacity(labels.len());
            for (label, n_label) in per_label.iter().enumerate() {
                let denominator = *n_label as f64 + self.smoothing * bins;
                for per_value in counts.values() {
                    log_probs[label].push(((per_value[label] as f64 + self.smoothing) / denominator).ln());
                }
                log_unseen.push((self.smoothing / denominator).ln());
            }

            features.push(FeatureDistribution {
                missing,
                values: counts.into_keys().collect(),
                log_probs,
                log_unseen,
            });
        }

        tracing::debug!(
            "Trained Naive Bayes on {} examples, {} labels, {} features",
            examples.len(),
            labels.len(),
            features.len()
        );

        Ok(NaiveBayesModel { labels, log_priors, features })
    }
}

impl NaiveBayesModel {
    /// Log-score of every label, in label order.
    ///
    /// Features the model knows but the vector lacks count as their zero value;
    /// values past the model's dimension are ignored.
    pub fn scores(&self, vector: &FeatureVector) -> Vec<(Genre, f64)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(label, genre)| {
                let likelihood: f64 = self
                    .features
                    .iter()
                    .enumerate()
                    .map(|(idx, dist)| dist.log_prob(label, vector.get(idx).unwrap_or(dist.missing)))
                    .sum();
                (genre.clone(), self.log_priors[label] + likelihood)
            })
            .collect()
    }

    /// Prior probability of a label, if it was seen in training.
    pub fn prior(&self, genre: &Genre) -> Option<f64> {
        let idx = self.labels.binary_search(genre).ok()?;
        Some(self.log_priors[idx].exp())
    }

    /// Conditional probability of a feature value under a label.
    pub fn conditional(&self, feature: usize, value: FeatureValue, genre: &Genre) -> Option<f64> {
        let label = self.labels.binary_search(genre).ok()?;
        self.features.get(feature).map(|d| d.prob(label, value))
    }

    /// The `n` feature values whose probability varies most across labels.
    ///
    /// Ranked by max/min probability ratio; ties keep schema order.
    pub fn most_informative(&self, n: usize) -> Vec<InformativeFeature> {
        if self.labels.len() < 2 {
            return Vec::new();
        }

        let mut ranked = Vec::new();
        for (index, dist) in self.features.iter().enumerate() {
            for value in &dist.values {
                let probs: Vec<f64> = (0..self.labels.len()).map(|l| dist.prob(l, *value)).collect();
                let (best, _) = argmax(&probs);
                let (worst, _) = argmin(&probs);
                ranked.push(InformativeFeature {
                    index,
                    value: *value,
                    favored: self.labels[best].clone(),
                    disfavored: self.labels[worst].clone(),
                    ratio: probs[best] / probs[worst],
                });
            }
        }

        ranked.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then(a.index.cmp(&b.index)));
        ranked.truncate(n);
        ranked
    }
}

impl Model for NaiveBayesModel {
    fn classify(&self, features: &FeatureVector) -> Genre {
        let scores = self.scores(features);
        let mut best: Option<&(Genre, f64)> = None;
        // labels are sorted, so keeping the first maximum favors the lexically smallest
        for entry in &scores {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map_or_else(|| self.labels[0].clone(), |(genre, _)| genre.clone())
    }

    fn labels(&self) -> &[Genre] {
        &self.labels
    }
}

fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc })
}

fn argmin(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |acc, (i, v)| if v < acc.1 { (i, v) } else { acc })
}
