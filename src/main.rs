//! `lyricgenre` - classify a lyrics corpus by genre and report the scores.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use lyricgenre::config::{Config, ExperimentConfig, FeatureConfig};
use lyricgenre::constants::{experiment, selection};
use lyricgenre::corpus::Corpus;
use lyricgenre::error::Error;
use lyricgenre::pipeline::{run_experiment, TracingProgress};
use lyricgenre::report::Report;
use lyricgenre::types::{Genre, GramOrder};

/// Optional feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Feature {
    /// Structural tag counts
    Meta,
    /// Drop stopword and punctuation unigrams
    Stopwords,
    /// Word/punctuation tokenizer for unigrams
    Tokenize,
    /// Stem unigrams
    Stem,
    /// Bigram presence
    Bigram,
    /// Trigram presence
    Trigram,
    /// Four-gram presence
    Fourgram,
    /// Five-gram presence
    Fivegram,
}

/// Classify song lyrics by genre with Naive Bayes
#[derive(Parser, Debug)]
#[clap(name = "lyricgenre", version)]
struct Args {
    /// Project file listing `[artist, title, genre]` entries (default: $LYRICS_PROJECT_FILE)
    project_file: Option<PathBuf>,

    /// Folder of lyrics files named `artist~title` (default: $LYRICS_DIR or ./lyrics)
    #[clap(long, value_name = "DIR")]
    lyrics_dir: Option<PathBuf>,

    /// Load `<DIR>/<genre>/<song>` files instead of a project file
    #[clap(long, value_name = "DIR", conflicts_with = "project_file")]
    genre_dirs: Option<PathBuf>,

    /// Only classify these genres
    #[clap(long, value_delimiter = ',')]
    genres: Vec<String>,

    /// Keep at most this many songs per genre
    #[clap(long)]
    count: Option<usize>,

    /// Training percentage
    #[clap(long, default_value_t = 70.0)]
    split: f64,

    /// Repeated shuffles to average over
    #[clap(short, long, default_value_t = experiment::DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Base shuffle seed (default: $LYRICS_SEED or 0)
    #[clap(long)]
    seed: Option<u64>,

    /// Run iterations in parallel
    #[clap(long)]
    parallel: bool,

    /// Enabled features
    #[clap(short, long, value_enum, value_delimiter = ',')]
    features: Vec<Feature>,

    /// Unigram vocabulary cap
    #[clap(long, default_value_t = selection::DEFAULT_UNIGRAM_CAP)]
    uni_thresh: usize,

    /// Bigram vocabulary cap
    #[clap(long, default_value_t = selection::DEFAULT_BIGRAM_CAP)]
    bi_thresh: usize,

    /// Trigram vocabulary cap
    #[clap(long, default_value_t = selection::DEFAULT_TRIGRAM_CAP)]
    tri_thresh: usize,

    /// Four-gram vocabulary cap
    #[clap(long, default_value_t = selection::DEFAULT_FOUR_GRAM_CAP)]
    four_thresh: usize,

    /// Five-gram vocabulary cap
    #[clap(long, default_value_t = selection::DEFAULT_FIVE_GRAM_CAP)]
    five_thresh: usize,

    /// Minimum training frequency of a selected gram (never below 2)
    #[clap(long, default_value_t = selection::NOISE_FLOOR)]
    min_count: usize,

    /// Flag songs with at most this many characters (disabled when not positive)
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    max_chars: i64,

    /// Flag songs with at most this many words (disabled when not positive)
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    max_words: i64,

    /// Flag songs with at most this many unique words (disabled when not positive)
    #[clap(long, default_value_t = -1, allow_negative_numbers = true)]
    max_unique: i64,

    /// Additive smoothing constant
    #[clap(long, default_value_t = experiment::DEFAULT_SMOOTHING)]
    smoothing: f64,

    /// Informative features listed per iteration
    #[clap(long, default_value_t = experiment::DEFAULT_SHOW_FEATURES)]
    show_features: usize,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,
}

impl Args {
    fn feature_config(&self) -> FeatureConfig {
        let mut features = FeatureConfig {
            meta: self.features.contains(&Feature::Meta),
            stopwords: self.features.contains(&Feature::Stopwords),
            tokenize: self.features.contains(&Feature::Tokenize),
            stem: self.features.contains(&Feature::Stem),
            max_chars: self.max_chars,
            max_words: self.max_words,
            max_unique: self.max_unique,
            ..FeatureConfig::default()
        };

        let orders = [
            (GramOrder::Unigram, self.uni_thresh, true),
            (GramOrder::Bigram, self.bi_thresh, self.features.contains(&Feature::Bigram)),
            (GramOrder::Trigram, self.tri_thresh, self.features.contains(&Feature::Trigram)),
            (GramOrder::FourGram, self.four_thresh, self.features.contains(&Feature::Fourgram)),
            (GramOrder::FiveGram, self.five_thresh, self.features.contains(&Feature::Fivegram)),
        ];
        for (order, cap, enabled) in orders {
            let cfg = features.order_mut(order);
            cfg.cap = cap;
            cfg.enabled = enabled;
            cfg.min_count = self.min_count;
        }
        features
    }

    fn experiment_config(&self, default_seed: u64) -> ExperimentConfig {
        ExperimentConfig {
            split: self.split / 100.0,
            iterations: self.iterations,
            seed: self.seed.unwrap_or(default_seed),
            parallel: self.parallel,
            smoothing: self.smoothing,
            show_features: self.show_features,
            features: self.feature_config(),
        }
    }

    fn load_corpus(&self, config: &Config) -> lyricgenre::error::Result<Corpus> {
        let mut corpus = if let Some(root) = &self.genre_dirs {
            Corpus::load_genre_dirs(root)?
        } else {
            let project_file = self
                .project_file
                .clone()
                .or_else(|| config.project_file.clone())
                .ok_or_else(|| {
                    Error::config(
                        "No project file given",
                        "Pass a project file, set LYRICS_PROJECT_FILE, or use --genre-dirs",
                    )
                })?;
            let lyrics_dir = self.lyrics_dir.as_ref().unwrap_or(&config.lyrics_dir);
            Corpus::load_project(&project_file, lyrics_dir)?
        };

        let genres: Vec<Genre> = self.genres.iter().map(|g| Genre::from(g.as_str())).collect();
        corpus.retain_genres(&genres);
        if let Some(count) = self.count {
            corpus.limit_per_genre(count);
        }

        if corpus.is_empty() {
            return Err(Error::Corpus("No songs left after loading and filtering".to_string()));
        }
        Ok(corpus)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    tracing::info!("{} {}", config.app_name(), config.app_version());

    let experiment = args.experiment_config(config.seed);
    experiment.validate()?;
    let corpus = args.load_corpus(&config)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the running iterations");
            flag.store(true, Ordering::SeqCst);
        }
    });

    let (corpus, experiment, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = run_experiment(corpus.songs(), &experiment, &TracingProgress, &cancel);
        (corpus, experiment, outcome)
    })
    .await?;

    let report = Report::new(&experiment, &corpus, outcome?);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
