//! Experiment pipeline.
//!
//! One iteration shuffles the analyzed corpus with its own seed, splits it,
//! selects vocabularies from the training partition, builds vectors for both
//! partitions, trains a fresh engine and scores it on the test partition.
//! An experiment runs several iterations and averages their scores.
//!
//! Iterations share nothing mutable, so they may run on the rayon pool.
//! Cancellation is checked before and after each iteration; an iteration that
//! was still running when the flag was raised is discarded.

pub mod progress;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::classifier::{ClassifierEngine, InformativeFeature, LabeledVector, NaiveBayes};
use crate::config::{ExperimentConfig, FeatureConfig};
use crate::error::{Error, Result};
use crate::evaluate::{evaluate, Evaluation};
use crate::features::{select, AnalyzedSong, FeatureBuilder, FeatureSchema, FeatureValue};
use crate::lyrics::{GramExtractor, TextProcessor};
use crate::split::{shuffle, split};
use crate::types::{Genre, GramOrder, Song};

pub use progress::{NoProgress, ProgressEvent, ProgressObserver, TracingProgress};

/// An informative feature with its schema name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFeature {
    /// Display name of the feature key.
    pub name: String,
    /// The value compared.
    pub value: FeatureValue,
    /// Genre under which the value is most likely.
    pub favored: Genre,
    /// Genre under which the value is least likely.
    pub disfavored: Genre,
    /// Ratio of the two probabilities.
    pub ratio: f64,
}

impl NamedFeature {
    fn resolve(feature: InformativeFeature, schema: &FeatureSchema) -> Self {
        let name = schema
            .key(feature.index)
            .map_or_else(|| format!("#{}", feature.index), ToString::to_string);
        Self {
            name,
            value: feature.value,
            favored: feature.favored,
            disfavored: feature.disfavored,
            ratio: feature.ratio,
        }
    }
}

/// Scores and sizes of one iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationResult {
    /// Zero-based iteration number.
    pub iteration: usize,
    /// Seed the corpus was shuffled with.
    pub seed: u64,
    /// Songs in the training partition.
    pub train_size: usize,
    /// Songs in the test partition.
    pub test_size: usize,
    /// Vocabulary size per enabled order.
    pub vocabulary: Vec<(GramOrder, usize)>,
    /// Number of features in the schema.
    pub features: usize,
    /// Test scores.
    pub evaluation: Evaluation,
    /// Most informative features of the trained model.
    pub informative: Vec<NamedFeature>,
}

/// Per-genre scores averaged over the iterations where they were defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSummary {
    /// The genre.
    pub genre: Genre,
    /// Mean precision.
    pub precision: Option<f64>,
    /// Mean recall.
    pub recall: Option<f64>,
    /// Mean F-measure.
    pub f_measure: Option<f64>,
}

/// Results of a whole experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentOutcome {
    /// Iterations requested.
    pub requested: usize,
    /// Completed iterations in iteration order.
    pub iterations: Vec<IterationResult>,
    /// Mean accuracy over iterations with a defined accuracy.
    pub mean_accuracy: Option<f64>,
    /// Averaged per-genre scores in lexical genre order.
    pub genres: Vec<GenreSummary>,
    /// Wall-clock time of the experiment.
    pub elapsed: Duration,
    /// Whether the run was cut short.
    pub cancelled: bool,
}

impl ExperimentOutcome {
    /// Accuracy of each completed iteration.
    pub fn accuracies(&self) -> Vec<Option<f64>> {
        self.iterations.iter().map(|it| it.evaluation.accuracy).collect()
    }
}

/// Extract grams from every song, keeping corpus order.
pub fn analyze_corpus(songs: &[Song], features: &FeatureConfig, parallel: bool) -> Vec<AnalyzedSong> {
    let extractor = GramExtractor::new(TextProcessor::new(features));
    if parallel {
        songs.par_iter().map(|s| AnalyzedSong::analyze(s, &extractor)).collect()
    } else {
        songs.iter().map(|s| AnalyzedSong::analyze(s, &extractor)).collect()
    }
}

/// Run one split/select/build/train/evaluate pass.
pub fn run_iteration(
    analyzed: &[AnalyzedSong],
    config: &ExperimentConfig,
    iteration: usize,
    observer: &dyn ProgressObserver,
) -> Result<IterationResult> {
    let seed = config.iteration_seed(iteration);
    observer.on_event(&ProgressEvent::IterationStarted { iteration, seed });

    let mut order: Vec<&AnalyzedSong> = analyzed.iter().collect();
    shuffle(&mut order, seed);
    let (train, test) = split(order, config.split)?;

    let vocabularies = select(&train, &config.features);
    let sizes = vocabularies.sizes();
    observer.on_event(&ProgressEvent::VocabularySelected { iteration, sizes: sizes.clone() });

    let builder = FeatureBuilder::new(&vocabularies, &config.features);
    let labeled = |song: &&AnalyzedSong| -> LabeledVector { (builder.build(song), song.genre.clone()) };
    let train_vectors = train.map(labeled);
    let test_vectors = test.map(labeled);

    let mut engine = ClassifierEngine::new(NaiveBayes::new(config.smoothing));
    engine.train(&train_vectors)?;
    let model = engine.into_model().ok_or(Error::Untrained)?;

    let evaluation = evaluate(&model, test_vectors.as_slice());
    let informative = model
        .most_informative(config.show_features)
        .into_iter()
        .map(|f| NamedFeature::resolve(f, builder.schema()))
        .collect();

    Ok(IterationResult {
        iteration,
        seed,
        train_size: train_vectors.len(),
        test_size: test_vectors.len(),
        vocabulary: sizes,
        features: builder.schema().len(),
        evaluation,
        informative,
    })
}

/// Run every configured iteration over a corpus and aggregate the scores.
///
/// Raising `cancel` stops the run between iterations. Completed iterations are
/// still returned; if none completed the result is [`Error::Cancelled`].
pub fn run_experiment(
    songs: &[Song],
    config: &ExperimentConfig,
    observer: &dyn ProgressObserver,
    cancel: &AtomicBool,
) -> Result<ExperimentOutcome> {
    config.validate()?;
    if songs.is_empty() {
        return Err(Error::Corpus("No songs to classify".to_string()));
    }

    let start = Instant::now();
    let analyzed = analyze_corpus(songs, &config.features, config.parallel);
    observer.on_event(&ProgressEvent::CorpusAnalyzed { songs: analyzed.len() });

    let run = |iteration: usize| -> Option<Result<IterationResult>> {
        if cancel.load(Ordering::SeqCst) {
            return None;
        }
        let result = run_iteration(&analyzed, config, iteration, observer);
        if cancel.load(Ordering::SeqCst) {
            observer.on_event(&ProgressEvent::IterationDiscarded { iteration });
            return None;
        }
        if let Ok(done) = &result {
            observer.on_event(&ProgressEvent::IterationFinished {
                iteration,
                accuracy: done.evaluation.accuracy,
            });
        }
        Some(result)
    };

    let runs: Vec<Option<Result<IterationResult>>> = if config.parallel {
        (0..config.iterations).into_par_iter().map(&run).collect()
    } else {
        (0..config.iterations).map(&run).collect()
    };

    let mut iterations = Vec::with_capacity(config.iterations);
    for result in runs.into_iter().flatten() {
        iterations.push(result?);
    }

    let cancelled = iterations.len() < config.iterations;
    if iterations.is_empty() {
        return Err(Error::Cancelled);
    }

    let mean_accuracy = mean(iterations.iter().filter_map(|it| it.evaluation.accuracy));
    let genres = summarize_genres(&iterations);
    let elapsed = start.elapsed();

    tracing::info!(
        "Experiment finished: {}/{} iterations in {:?}",
        iterations.len(),
        config.iterations,
        elapsed
    );

    Ok(ExperimentOutcome {
        requested: config.iterations,
        iterations,
        mean_accuracy,
        genres,
        elapsed,
        cancelled,
    })
}

#[derive(Default)]
struct MetricSamples {
    precision: Vec<f64>,
    recall: Vec<f64>,
    f_measure: Vec<f64>,
}

fn summarize_genres(iterations: &[IterationResult]) -> Vec<GenreSummary> {
    let mut samples: BTreeMap<&Genre, MetricSamples> = BTreeMap::new();
    for stats in iterations.iter().flat_map(|it| &it.evaluation.genres) {
        let entry = samples.entry(&stats.genre).or_default();
        entry.precision.extend(stats.precision);
        entry.recall.extend(stats.recall);
        entry.f_measure.extend(stats.f_measure);
    }

    samples
        .into_iter()
        .map(|(genre, s)| GenreSummary {
            genre: genre.clone(),
            precision: mean(s.precision.into_iter()),
            recall: mean(s.recall.into_iter()),
            f_measure: mean(s.f_measure.into_iter()),
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
