//! Feature selection, schema and per-song feature vectors.
//!
//! Vocabularies are selected from the training partition only. Once frozen,
//! they define a [`FeatureSchema`] whose keys every song's [`FeatureVector`]
//! follows position by position.

pub mod builder;
pub mod schema;
pub mod selector;

use crate::lyrics::{ExtractedLyrics, GramExtractor};
use crate::types::{Genre, Song, SongId};

pub use builder::FeatureBuilder;
pub use schema::{FeatureKey, FeatureSchema, FeatureValue, FeatureVector, LengthMetric};
pub use selector::{select, Vocabularies, Vocabulary};

/// A song reduced to its genre label and extracted grams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedSong {
    /// Song identifier.
    pub id: SongId,
    /// Genre label.
    pub genre: Genre,
    /// Grams, tags and length measures.
    pub extracted: ExtractedLyrics,
}

impl AnalyzedSong {
    /// Run the extractor over a song.
    pub fn analyze(song: &Song, extractor: &GramExtractor) -> Self {
        Self {
            id: song.id.clone(),
            genre: song.genre.clone(),
            extracted: extractor.extract(&song.lyrics),
        }
    }
}
