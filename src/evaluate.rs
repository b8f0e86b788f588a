//! Accuracy and per-genre precision, recall and F-measure.
//!
//! Metrics that cannot be computed (no predictions or no true instances of a
//! genre, an empty test set) are `None`, never 0.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::classifier::{LabeledVector, Model};
use crate::types::Genre;

/// Scores of one genre over a test set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreStats {
    /// The genre.
    pub genre: Genre,
    /// Test instances truly of this genre.
    pub support: usize,
    /// Test instances predicted as this genre.
    pub predicted: usize,
    /// Instances both true and predicted.
    pub correct: usize,
    /// `correct / predicted`.
    pub precision: Option<f64>,
    /// `correct / support`.
    pub recall: Option<f64>,
    /// Harmonic mean of precision and recall.
    pub f_measure: Option<f64>,
}

impl GenreStats {
    fn new(genre: Genre, support: usize, predicted: usize, correct: usize) -> Self {
        let precision = ratio(correct, predicted);
        let recall = ratio(correct, support);
        let f_measure = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            (Some(_), Some(_)) => Some(0.0),
            _ => None,
        };
        Self { genre, support, predicted, correct, precision, recall, f_measure }
    }
}

/// Result of scoring a model on a test set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Test instances scored.
    pub total: usize,
    /// Instances classified correctly.
    pub correct: usize,
    /// `correct / total`; `None` for an empty test set.
    pub accuracy: Option<f64>,
    /// Per-genre scores in lexical genre order.
    pub genres: Vec<GenreStats>,
}

impl Evaluation {
    /// Score `(truth, prediction)` pairs.
    ///
    /// Genres listed in `known` are reported even when absent from the pairs.
    pub fn from_predictions<'a, I>(pairs: I, known: &[Genre]) -> Self
    where
        I: IntoIterator<Item = (&'a Genre, &'a Genre)>,
    {
        let pairs: Vec<(&Genre, &Genre)> = pairs.into_iter().collect();

        let mut genres: BTreeSet<&Genre> = known.iter().collect();
        for (truth, predicted) in &pairs {
            genres.insert(*truth);
            genres.insert(*predicted);
        }

        let correct = pairs.iter().filter(|(t, p)| t == p).count();
        let stats = genres
            .into_iter()
            .map(|genre| {
                let support = pairs.iter().filter(|(t, _)| *t == genre).count();
                let predicted = pairs.iter().filter(|(_, p)| *p == genre).count();
                let hits = pairs.iter().filter(|(t, p)| *t == genre && *p == genre).count();
                GenreStats::new(genre.clone(), support, predicted, hits)
            })
            .collect();

        Self {
            total: pairs.len(),
            correct,
            accuracy: ratio(correct, pairs.len()),
            genres: stats,
        }
    }

    /// Scores of one genre.
    pub fn genre(&self, genre: &Genre) -> Option<&GenreStats> {
        self.genres.iter().find(|s| &s.genre == genre)
    }
}

/// Classify every test instance and score the predictions.
pub fn evaluate<M: Model + ?Sized>(model: &M, test: &[LabeledVector]) -> Evaluation {
    let predictions: Vec<Genre> = test.iter().map(|(features, _)| model.classify(features)).collect();
    Evaluation::from_predictions(
        test.iter().map(|(_, truth)| truth).zip(&predictions),
        model.labels(),
    )
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

    use super::*;

    fn g(s: &str) -> Genre {
        Genre::from(s)
    }

    #[test]
    fn accuracy_counts_matches() {
        let truth = [g("pop"), g("pop"), g("rap"), g("rap")];
        let predicted = [g("pop"), g("rap"), g("rap"), g("rap")];
        let eval = Evaluation::from_predictions(truth.iter().zip(&predicted), &[]);
        assert_eq!(eval.total, 4);
        assert_eq!(eval.correct, 3);
        assert_eq!(eval.accuracy, Some(0.75));

        let pop = eval.genre(&g("pop")).unwrap();
        assert_eq!(pop.precision, Some(1.0));
        assert_eq!(pop.recall, Some(0.5));
        assert!((pop.f_measure.unwrap() - 2.0 / 3.0).abs() < 1e-12);

        let rap = eval.genre(&g("rap")).unwrap();
        assert!((rap.precision.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(rap.recall, Some(1.0));
    }

    #[test]
    fn absent_genres_are_not_computable() {
        let truth = [g("pop")];
        let predicted = [g("pop")];
        let eval = Evaluation::from_predictions(truth.iter().zip(&predicted), &[g("jazz")]);
        let jazz = eval.genre(&g("jazz")).unwrap();
        assert_eq!(jazz.precision, None);
        assert_eq!(jazz.recall, None);
        assert_eq!(jazz.f_measure, None);
    }

    #[test]
    fn never_predicted_genre_has_recall_but_no_precision() {
        let truth = [g("rock")];
        let predicted = [g("pop")];
        let eval = Evaluation::from_predictions(truth.iter().zip(&predicted), &[]);
        let rock = eval.genre(&g("rock")).unwrap();
        assert_eq!(rock.precision, None);
        assert_eq!(rock.recall, Some(0.0));
        assert_eq!(rock.f_measure, None);

        let pop = eval.genre(&g("pop")).unwrap();
        assert_eq!(pop.precision, Some(0.0));
        assert_eq!(pop.recall, None);
    }

    #[test]
    fn empty_test_set_has_no_accuracy() {
        let eval = Evaluation::from_predictions(std::iter::empty(), &[g("pop")]);
        assert_eq!(eval.total, 0);
        assert_eq!(eval.accuracy, None);
    }

    #[test]
    fn zero_precision_and_recall_give_zero_f_measure() {
        let stats = GenreStats::new(g("pop"), 2, 3, 0);
        assert_eq!(stats.f_measure, Some(0.0));
    }
}
