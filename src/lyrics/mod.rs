//! Lyrics processing: gram extraction and structural tags.
//!
//! A lyric is read line by line. Lines whose first and last non-whitespace
//! characters are `[` and `]` are structural tags (`[Chorus]`); they are recorded
//! lowercased and kept out of all gram text. Bigrams through five-grams are built
//! from single-space splits of each remaining line and never cross a line
//! boundary. Unigrams come from the concatenated non-tag text through the
//! [`TextProcessor`], so tokenization and stemming only ever affect unigrams.

pub mod stopwords;
pub mod structure;
pub mod tokenize;

use std::collections::HashMap;

use crate::constants::grams::{MAX_ORDER, MIN_LINE_LEN, SEPARATOR};
use crate::types::GramOrder;

pub use structure::StructureCounts;
pub use tokenize::{wordpunct, TextProcessor};

/// Gram occurrence counts that remember first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GramBag {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl GramBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `gram`.
    pub fn insert(&mut self, gram: impl Into<String>) {
        self.add(gram, 1);
    }

    /// Record `count` occurrences of `gram`.
    pub fn add(&mut self, gram: impl Into<String>, count: usize) {
        let gram = gram.into();
        if let Some(c) = self.counts.get_mut(&gram) {
            *c += count;
        } else {
            self.order.push(gram.clone());
            self.counts.insert(gram, count);
        }
    }

    /// Whether `gram` occurred at least once.
    pub fn contains(&self, gram: &str) -> bool {
        self.counts.contains_key(gram)
    }

    /// Occurrences of `gram`.
    pub fn count(&self, gram: &str) -> usize {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// Number of distinct grams.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no gram was recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Distinct grams with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(|g| (g.as_str(), self.counts.get(g).copied().unwrap_or(0)))
    }

    /// Add every occurrence in `other`, keeping this bag's order for known grams.
    pub fn merge(&mut self, other: &Self) {
        for (gram, count) in other.iter() {
            self.add(gram, count);
        }
    }
}

/// Size measures of the full lyric text, structural lines included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthStats {
    /// Characters in the raw lyrics.
    pub chars: usize,
    /// Word/punctuation tokens.
    pub words: usize,
    /// Distinct word/punctuation tokens.
    pub unique_words: usize,
}

impl LengthStats {
    /// Measure raw lyric text.
    pub fn measure(lyrics: &str) -> Self {
        let tokens: Vec<&str> = wordpunct(lyrics).collect();
        let unique_words = tokens.iter().collect::<std::collections::HashSet<_>>().len();
        Self {
            chars: lyrics.chars().count(),
            words: tokens.len(),
            unique_words,
        }
    }
}

/// Everything extracted from one lyric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLyrics {
    grams: [GramBag; MAX_ORDER],
    /// Lowercased, bracket-stripped structural tag contents in order.
    pub tags: Vec<String>,
    /// Length measures of the raw text.
    pub length: LengthStats,
}

impl ExtractedLyrics {
    /// Grams of one order.
    pub fn grams(&self, order: GramOrder) -> &GramBag {
        &self.grams[order.index()]
    }

    /// Counts of the canonical structural categories.
    pub fn structure(&self) -> StructureCounts {
        StructureCounts::from_tags(&self.tags)
    }
}

/// Splits lyrics into grams of every order plus structural tags.
#[derive(Debug)]
pub struct GramExtractor {
    processor: TextProcessor,
}

impl GramExtractor {
    /// Extractor using the given unigram processor.
    pub const fn new(processor: TextProcessor) -> Self {
        Self { processor }
    }

    /// Extract grams, tags and length measures from raw lyrics.
    pub fn extract(&self, lyrics: &str) -> ExtractedLyrics {
        let mut extracted = ExtractedLyrics {
            length: LengthStats::measure(lyrics),
            ..ExtractedLyrics::default()
        };
        let mut text_lines = Vec::new();

        for raw in lyrics.lines() {
            let line = raw.trim_end();
            if line.chars().count() <= MIN_LINE_LEN {
                continue;
            }

            if let Some(tag) = structural_tag(line) {
                extracted.tags.push(tag);
                continue;
            }

            text_lines.push(line);

            let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
            for i in 0..tokens.len() {
                for order in &GramOrder::all()[1..] {
                    let k = order.token_count();
                    if i + 1 >= k {
                        let gram = tokens[i + 1 - k..=i].join(SEPARATOR);
                        extracted.grams[order.index()].insert(gram);
                    }
                }
            }
        }

        let text = text_lines.join(" ");
        let unigrams = &mut extracted.grams[GramOrder::Unigram.index()];
        for token in self.processor.unigrams(&text) {
            unigrams.insert(token);
        }

        extracted
    }
}

/// Bracket-stripped, lowercased content of a structural tag line.
pub fn structural_tag(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(trimmed[1..trimmed.len() - 1].trim().to_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::config::FeatureConfig;

    fn plain() -> GramExtractor {
        GramExtractor::new(TextProcessor::plain())
    }

    #[test]
    fn tag_line_is_excluded_from_grams() {
        let extracted = plain().extract("[Chorus]\nhold me close\n");
        let unigrams = extracted.grams(GramOrder::Unigram);
        assert_eq!(extracted.tags, vec!["chorus"]);
        assert!(!unigrams.contains("[Chorus]"));
        assert!(!unigrams.contains("Chorus"));
        assert!(unigrams.contains("hold"));
        assert_eq!(extracted.structure().get("chorus"), 1);
    }

    #[test]
    fn tag_detection_ignores_surrounding_whitespace() {
        assert_eq!(structural_tag("  [Verse 1: Artist]  "), Some("verse 1: artist".to_string()));
        assert_eq!(structural_tag("[Verse] and more"), None);
        assert_eq!(structural_tag("plain"), None);
    }

    #[test]
    fn ngrams_stay_within_a_line() {
        let extracted = plain().extract("a b c\nd e\n");
        let bigrams = extracted.grams(GramOrder::Bigram);
        assert!(bigrams.contains("a|b"));
        assert!(bigrams.contains("b|c"));
        assert!(bigrams.contains("d|e"));
        assert!(!bigrams.contains("c|d"));
        assert_eq!(bigrams.len(), 3);

        let trigrams = extracted.grams(GramOrder::Trigram);
        assert_eq!(trigrams.iter().collect::<Vec<_>>(), vec![("a|b|c", 1)]);
        assert!(extracted.grams(GramOrder::FourGram).is_empty());
    }

    #[test]
    fn five_grams_slide_over_long_lines() {
        let extracted = plain().extract("one two three four five six");
        let five = extracted.grams(GramOrder::FiveGram);
        assert_eq!(five.len(), 2);
        assert!(five.contains("one|two|three|four|five"));
        assert!(five.contains("two|three|four|five|six"));
    }

    #[test]
    fn double_spaces_do_not_create_empty_tokens() {
        let extracted = plain().extract("la  la  land");
        let bigrams = extracted.grams(GramOrder::Bigram);
        assert_eq!(bigrams.count("la|la"), 1);
        assert_eq!(bigrams.count("la|land"), 1);
        assert!(!extracted.grams(GramOrder::Unigram).contains(""));
    }

    #[test]
    fn tabs_separate_unigrams() {
        let extracted = plain().extract("hello\tworld again");
        let unigrams = extracted.grams(GramOrder::Unigram);
        assert!(unigrams.contains("hello"));
        assert!(unigrams.contains("world"));
        assert!(!unigrams.contains("hello\tworld"));
        assert_eq!(unigrams.len(), 3);
    }

    #[test]
    fn short_lines_are_skipped() {
        let extracted = plain().extract("a\n\n   \nok go");
        let unigrams = extracted.grams(GramOrder::Unigram);
        assert!(!unigrams.contains("a"));
        assert!(unigrams.contains("ok"));
    }

    #[test]
    fn unigram_counts_accumulate() {
        let extracted = plain().extract("love love me\nlove you");
        assert_eq!(extracted.grams(GramOrder::Unigram).count("love"), 3);
    }

    #[test]
    fn higher_orders_ignore_tokenize_and_stem() {
        let features = FeatureConfig { tokenize: true, stem: true, ..FeatureConfig::default() };
        let extractor = GramExtractor::new(TextProcessor::new(&features));
        let extracted = extractor.extract("Running wild!");
        assert!(extracted.grams(GramOrder::Unigram).contains("run"));
        assert!(extracted.grams(GramOrder::Unigram).contains("!"));
        assert!(extracted.grams(GramOrder::Bigram).contains("Running|wild!"));
    }

    #[test]
    fn length_stats_include_tag_lines() {
        let stats = LengthStats::measure("[Intro]\nyeah yeah");
        assert_eq!(stats.chars, 17);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.unique_words, 4);
    }

    #[test]
    fn bag_merge_keeps_first_seen_order() {
        let mut a = GramBag::new();
        a.insert("x");
        let mut b = GramBag::new();
        b.insert("y");
        b.add("x", 2);
        a.merge(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![("x", 3), ("y", 1)]);
    }
}
