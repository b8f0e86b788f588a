//! Progress events emitted while an experiment runs.

use serde::{Deserialize, Serialize};

use crate::types::GramOrder;

/// Something that happened during an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Grams extracted for every song.
    CorpusAnalyzed {
        /// Songs analyzed.
        songs: usize,
    },
    /// An iteration began.
    IterationStarted {
        /// Zero-based iteration number.
        iteration: usize,
        /// Shuffle seed of the iteration.
        seed: u64,
    },
    /// Vocabularies frozen from the training partition.
    VocabularySelected {
        /// Zero-based iteration number.
        iteration: usize,
        /// Vocabulary size per enabled order.
        sizes: Vec<(GramOrder, usize)>,
    },
    /// An iteration finished and counts toward the results.
    IterationFinished {
        /// Zero-based iteration number.
        iteration: usize,
        /// Test accuracy, if defined.
        accuracy: Option<f64>,
    },
    /// An iteration was cancelled; its results are dropped.
    IterationDiscarded {
        /// Zero-based iteration number.
        iteration: usize,
    },
}

/// Receives progress events. Called from worker threads when iterations run in parallel.
pub trait ProgressObserver: Sync {
    /// Handle one event.
    fn on_event(&self, event: &ProgressEvent);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_event(&self, _event: &ProgressEvent) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::CorpusAnalyzed { songs } => {
                tracing::info!("Extracted grams from {songs} songs");
            }
            ProgressEvent::IterationStarted { iteration, seed } => {
                tracing::debug!("Iteration {iteration} started (seed {seed})");
            }
            ProgressEvent::VocabularySelected { iteration, sizes } => {
                let sizes = sizes
                    .iter()
                    .map(|(order, n)| format!("{order}={n}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                tracing::info!("Iteration {iteration} vocabulary: {sizes}");
            }
            ProgressEvent::IterationFinished { iteration, accuracy } => match accuracy {
                Some(acc) => tracing::info!("Iteration {iteration} accuracy {acc:.4}"),
                None => tracing::info!("Iteration {iteration} had an empty test set"),
            },
            ProgressEvent::IterationDiscarded { iteration } => {
                tracing::warn!("Iteration {iteration} cancelled, results discarded");
            }
        }
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent) + Sync,
{
    fn on_event(&self, event: &ProgressEvent) {
        self(event);
    }
}
