//! Experiment report.
//!
//! Collects the run configuration, corpus summary and outcome into one
//! serializable value, rendered as plain text or pretty JSON.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::pipeline::{ExperimentOutcome, GenreSummary, IterationResult};
use crate::types::{Genre, SongId};

/// Songs per genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    /// The genre.
    pub genre: Genre,
    /// Songs of the genre.
    pub songs: usize,
}

/// What the experiment ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    /// Songs classified.
    pub songs: usize,
    /// Songs listed without lyrics.
    pub missing: Vec<SongId>,
    /// Genre distribution.
    pub genres: Vec<GenreCount>,
}

impl CorpusSummary {
    /// Summarize a loaded corpus.
    pub fn of(corpus: &Corpus) -> Self {
        Self {
            songs: corpus.len(),
            missing: corpus.summary().missing.clone(),
            genres: corpus
                .distribution()
                .into_iter()
                .map(|(genre, songs)| GenreCount { genre, songs })
                .collect(),
        }
    }
}

/// Full experiment report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Tool name and version.
    pub tool: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Settings used.
    pub config: ExperimentConfig,
    /// Corpus summary.
    pub corpus: CorpusSummary,
    /// Iterations requested.
    pub requested_iterations: usize,
    /// Completed iterations.
    pub iterations: Vec<IterationResult>,
    /// Mean accuracy over completed iterations.
    pub mean_accuracy: Option<f64>,
    /// Averaged per-genre scores.
    pub genres: Vec<GenreSummary>,
    /// Wall-clock seconds.
    pub elapsed_secs: f64,
    /// Whether the run was cut short.
    pub cancelled: bool,
}

impl Report {
    /// Assemble a report.
    pub fn new(config: &ExperimentConfig, corpus: &Corpus, outcome: ExperimentOutcome) -> Self {
        Self {
            tool: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            config: config.clone(),
            corpus: CorpusSummary::of(corpus),
            requested_iterations: outcome.requested,
            iterations: outcome.iterations,
            mean_accuracy: outcome.mean_accuracy,
            genres: outcome.genres,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            cancelled: outcome.cancelled,
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Msg(format!("Failed to serialize report: {e}")))
    }

    /// Plain text rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{} ({})", self.tool, self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Corpus: {} songs, {} missing lyrics", self.corpus.songs, self.corpus.missing.len());
        for count in &self.corpus.genres {
            let _ = writeln!(out, "  {:<16} {}", count.genre.as_str(), count.songs);
        }

        let _ = writeln!(out);
        for it in &self.iterations {
            let _ = writeln!(
                out,
                "Iteration {} (seed {}): train {}, test {}, {} features, accuracy {}",
                it.iteration,
                it.seed,
                it.train_size,
                it.test_size,
                it.features,
                fmt_metric(it.evaluation.accuracy)
            );
            for feature in &it.informative {
                let _ = writeln!(
                    out,
                    "  {:<32} = {:<6} {} : {} = {:.1} : 1",
                    feature.name,
                    feature.value.to_string(),
                    feature.favored,
                    feature.disfavored,
                    feature.ratio
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Accuracy: {} over {}/{} iterations",
            fmt_metric(self.mean_accuracy),
            self.iterations.len(),
            self.requested_iterations
        );
        let _ = writeln!(out, "{:<16} {:>9} {:>9} {:>9}", "genre", "precision", "recall", "f-measure");
        for g in &self.genres {
            let _ = writeln!(
                out,
                "{:<16} {:>9} {:>9} {:>9}",
                g.genre.as_str(),
                fmt_metric(g.precision),
                fmt_metric(g.recall),
                fmt_metric(g.f_measure)
            );
        }

        let _ = write!(out, "Elapsed: {:.2}s", self.elapsed_secs);
        if self.cancelled {
            let _ = write!(out, " (cancelled)");
        }
        out.push('\n');
        out
    }
}

/// Metric with four decimals, or `n/a` when undefined.
pub fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::time::Duration;

    use super::*;
    use crate::types::Song;

    fn report() -> Report {
        let corpus = Corpus::from_songs(vec![
            Song::new("a", "1", "pop", "x"),
            Song::new("b", "2", "rap", "x"),
        ]);
        let outcome = ExperimentOutcome {
            requested: 2,
            iterations: Vec::new(),
            mean_accuracy: None,
            genres: vec![GenreSummary {
                genre: Genre::from("pop"),
                precision: Some(0.5),
                recall: None,
                f_measure: None,
            }],
            elapsed: Duration::from_millis(1500),
            cancelled: true,
        };
        Report::new(&ExperimentConfig::default(), &corpus, outcome)
    }

    #[test]
    fn undefined_metrics_render_as_na() {
        let text = report().render_text();
        assert!(text.contains("Accuracy: n/a over 0/2 iterations"));
        assert!(text.contains("0.5000"));
        assert!(text.contains("n/a"));
        assert!(text.contains("(cancelled)"));
    }

    #[test]
    fn json_keeps_undefined_as_null() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert!(json["mean_accuracy"].is_null());
        assert!(json["genres"][0]["recall"].is_null());
        assert_eq!(json["corpus"]["genres"][1]["genre"], "rap");
        assert_eq!(json["elapsed_secs"], 1.5);
    }
}
