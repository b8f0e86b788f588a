//! Turns analyzed songs into feature vectors.

use crate::config::FeatureConfig;
use crate::features::schema::{FeatureKey, FeatureSchema, FeatureValue, FeatureVector, LengthMetric};
use crate::features::selector::Vocabularies;
use crate::features::AnalyzedSong;

/// Builds vectors against a frozen schema.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    schema: FeatureSchema,
}

impl FeatureBuilder {
    /// Freeze the schema for the given vocabularies and switches.
    pub fn new(vocabularies: &Vocabularies, features: &FeatureConfig) -> Self {
        Self { schema: FeatureSchema::new(vocabularies, features) }
    }

    /// The frozen schema.
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Feature vector of one song; one value per schema key.
    pub fn build(&self, song: &AnalyzedSong) -> FeatureVector {
        let extracted = &song.extracted;
        let structure = extracted.structure();

        let values = self
            .schema
            .keys()
            .iter()
            .map(|key| match key {
                FeatureKey::Gram { order, gram } => {
                    FeatureValue::Flag(extracted.grams(*order).contains(gram))
                }
                FeatureKey::Structure(category) => FeatureValue::Count(structure.get(category)),
                FeatureKey::Length { metric, threshold } => {
                    let measured = match metric {
                        LengthMetric::Chars => extracted.length.chars,
                        LengthMetric::Words => extracted.length.words,
                        LengthMetric::UniqueWords => extracted.length.unique_words,
                    };
                    FeatureValue::Flag(measured <= *threshold)
                }
            })
            .collect();

        FeatureVector::new(values)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::lyrics::{GramExtractor, TextProcessor};
    use crate::types::{GramOrder, Song};

    fn analyze(lyrics: &str) -> AnalyzedSong {
        let extractor = GramExtractor::new(TextProcessor::plain());
        AnalyzedSong::analyze(&Song::new("artist", "title", "rock", lyrics), &extractor)
    }

    #[test]
    fn gram_presence_flags() {
        let vocab = Vocabularies::from_grams([(GramOrder::Unigram, vec!["fire", "rain"])]);
        let builder = FeatureBuilder::new(&vocab, &FeatureConfig::default());
        let vector = builder.build(&analyze("we start the fire"));
        assert_eq!(vector.values(), &[FeatureValue::Flag(true), FeatureValue::Flag(false)]);
    }

    #[test]
    fn structure_counts_when_meta_enabled() {
        let features = FeatureConfig { meta: true, ..FeatureConfig::default() };
        let builder = FeatureBuilder::new(&Vocabularies::default(), &features);
        let vector = builder.build(&analyze("[Chorus]\nla la\n[Chorus]\nla la\n[Refrain]"));
        let named = vector.to_map(builder.schema());
        assert_eq!(named["meta(chorus)"], FeatureValue::Count(3));
        assert_eq!(named["meta(verse)"], FeatureValue::Count(0));
    }

    #[test]
    fn length_thresholds_are_inclusive() {
        let features = FeatureConfig { max_chars: 10, max_words: 2, ..FeatureConfig::default() };
        let builder = FeatureBuilder::new(&Vocabularies::default(), &features);

        let short = builder.build(&analyze("hey you"));
        assert_eq!(short.values(), &[FeatureValue::Flag(true), FeatureValue::Flag(true)]);

        let long = builder.build(&analyze("hey you out there in the cold"));
        assert_eq!(long.values(), &[FeatureValue::Flag(false), FeatureValue::Flag(false)]);
    }

    #[test]
    fn every_song_gets_the_same_keys() {
        let vocab = Vocabularies::from_grams([
            (GramOrder::Unigram, vec!["a", "b"]),
            (GramOrder::Bigram, vec!["a|b"]),
        ]);
        let features = FeatureConfig { meta: true, max_unique: 5, ..FeatureConfig::default() };
        let builder = FeatureBuilder::new(&vocab, &features);
        let first = builder.build(&analyze("a b"));
        let second = builder.build(&analyze(""));
        assert_eq!(first.len(), builder.schema().len());
        assert_eq!(
            first.to_map(builder.schema()).keys().collect::<Vec<_>>(),
            second.to_map(builder.schema()).keys().collect::<Vec<_>>()
        );
    }
}
