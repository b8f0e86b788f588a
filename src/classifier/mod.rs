//! Classifier engine.
//!
//! The engine owns an [`Estimator`] and, once trained, the [`Model`] it
//! produced. Training again replaces the model; the engine never goes back to
//! untrained.

pub mod naive_bayes;

use std::fmt;

use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::split::TrainSet;
use crate::types::Genre;

pub use naive_bayes::{InformativeFeature, NaiveBayes, NaiveBayesModel};

/// A feature vector with its true genre.
pub type LabeledVector = (FeatureVector, Genre);

/// Fits a model from labeled vectors.
pub trait Estimator {
    /// Model produced by training.
    type Model: Model;

    /// Fit a model. An empty training set is a configuration error.
    fn train(&self, examples: &[LabeledVector]) -> Result<Self::Model>;
}

/// A trained classifier.
pub trait Model: Send + Sync {
    /// Most likely genre for a feature vector.
    fn classify(&self, features: &FeatureVector) -> Genre;

    /// Genres seen in training, in lexical order.
    fn labels(&self) -> &[Genre];
}

/// Untrained or trained engine state.
#[derive(Debug)]
pub enum EngineState<M> {
    /// No model yet.
    Untrained,
    /// Model from the latest training run.
    Trained(M),
}

/// Estimator plus the model of its latest training run.
pub struct ClassifierEngine<E: Estimator = NaiveBayes> {
    estimator: E,
    state: EngineState<E::Model>,
}

impl<E: Estimator> ClassifierEngine<E> {
    /// Untrained engine around an estimator.
    pub const fn new(estimator: E) -> Self {
        Self { estimator, state: EngineState::Untrained }
    }

    /// Train on the training partition, discarding any previous model.
    pub fn train(&mut self, train: &TrainSet<LabeledVector>) -> Result<()> {
        let model = self.estimator.train(train.as_slice())?;
        self.state = EngineState::Trained(model);
        Ok(())
    }

    /// Classify with the trained model.
    pub fn classify(&self, features: &FeatureVector) -> Result<Genre> {
        self.model().map(|m| m.classify(features)).ok_or(Error::Untrained)
    }

    /// The trained model, if any.
    pub const fn model(&self) -> Option<&E::Model> {
        match &self.state {
            EngineState::Trained(model) => Some(model),
            EngineState::Untrained => None,
        }
    }

    /// Whether a model is available.
    pub const fn is_trained(&self) -> bool {
        matches!(self.state, EngineState::Trained(_))
    }

    /// Give up the engine, keeping the model.
    pub fn into_model(self) -> Option<E::Model> {
        match self.state {
            EngineState::Trained(model) => Some(model),
            EngineState::Untrained => None,
        }
    }
}

impl<E: Estimator> fmt::Debug for ClassifierEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierEngine")
            .field("trained", &self.is_trained())
            .finish_non_exhaustive()
    }
}

impl Default for ClassifierEngine<NaiveBayes> {
    fn default() -> Self {
        Self::new(NaiveBayes::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::features::FeatureValue;
    use crate::split::split;

    fn labeled(flag: bool, genre: &str) -> LabeledVector {
        (FeatureVector::new(vec![FeatureValue::Flag(flag)]), Genre::from(genre))
    }

    #[test]
    fn untrained_engine_refuses_to_classify() {
        let engine = ClassifierEngine::default();
        assert!(!engine.is_trained());
        assert!(matches!(engine.classify(&FeatureVector::empty()), Err(Error::Untrained)));
    }

    #[test]
    fn training_moves_to_trained() {
        let mut engine = ClassifierEngine::default();
        let (train, _) = split(vec![labeled(true, "rap"), labeled(false, "pop")], 1.0).unwrap();
        engine.train(&train).unwrap();
        assert!(engine.is_trained());
        assert_eq!(engine.classify(&FeatureVector::new(vec![FeatureValue::Flag(true)])).unwrap(), Genre::from("rap"));
    }

    #[test]
    fn retraining_replaces_the_model() {
        let mut engine = ClassifierEngine::default();
        let (first, _) = split(vec![labeled(true, "rap"), labeled(false, "pop")], 1.0).unwrap();
        engine.train(&first).unwrap();
        let (second, _) = split(vec![labeled(true, "country"), labeled(false, "rock")], 1.0).unwrap();
        engine.train(&second).unwrap();
        let labels = engine.model().unwrap().labels().to_vec();
        assert_eq!(labels, vec![Genre::from("country"), Genre::from("rock")]);
    }

    #[test]
    fn empty_training_set_is_fatal() {
        let mut engine = ClassifierEngine::default();
        let (train, _) = split(Vec::<LabeledVector>::new(), 1.0).unwrap();
        assert!(engine.train(&train).unwrap_err().is_fatal_config());
        assert!(!engine.is_trained());
    }
}
