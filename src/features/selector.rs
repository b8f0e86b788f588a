//! Frequency-ranked vocabulary selection per n-gram order.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};

use crate::config::FeatureConfig;
use crate::features::AnalyzedSong;
use crate::lyrics::stopwords::is_stopword_or_punctuation;
use crate::lyrics::GramBag;
use crate::split::TrainSet;
use crate::types::GramOrder;

/// Selected grams of one order, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    grams: Vec<String>,
    members: HashSet<String>,
}

impl Vocabulary {
    fn push(&mut self, gram: &str) {
        if self.members.insert(gram.to_string()) {
            self.grams.push(gram.to_string());
        }
    }

    /// Whether `gram` was selected.
    pub fn contains(&self, gram: &str) -> bool {
        self.members.contains(gram)
    }

    /// Selected grams in rank order.
    pub fn grams(&self) -> &[String] {
        &self.grams
    }

    /// Number of selected grams.
    pub fn len(&self) -> usize {
        self.grams.len()
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }
}

/// Vocabularies of every enabled order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabularies {
    by_order: BTreeMap<GramOrder, Vocabulary>,
}

impl Vocabularies {
    /// Vocabulary of one order, if that order is enabled.
    pub fn get(&self, order: GramOrder) -> Option<&Vocabulary> {
        self.by_order.get(&order)
    }

    /// Enabled orders with their vocabularies, lowest order first.
    pub fn iter(&self) -> impl Iterator<Item = (GramOrder, &Vocabulary)> {
        self.by_order.iter().map(|(o, v)| (*o, v))
    }

    /// Sizes per enabled order.
    pub fn sizes(&self) -> Vec<(GramOrder, usize)> {
        self.iter().map(|(o, v)| (o, v.len())).collect()
    }

    /// Vocabularies built from explicit gram lists, bypassing frequency ranking.
    pub fn from_grams<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (GramOrder, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut vocabularies = Self::default();
        for (order, grams) in entries {
            let vocabulary = vocabularies.by_order.entry(order).or_default();
            for gram in &grams {
                vocabulary.push(gram.as_ref());
            }
        }
        vocabularies
    }
}

/// Select the vocabulary of every enabled order from the training partition.
///
/// Grams are ranked by total occurrences across training songs, ties going to
/// the gram seen first. Grams under the order's frequency floor (never below 2)
/// are skipped; with stopword filtering on, stopword and punctuation unigrams
/// are skipped too. Selection stops at the order's cap.
pub fn select<S: Borrow<AnalyzedSong>>(train: &TrainSet<S>, features: &FeatureConfig) -> Vocabularies {
    let mut vocabularies = Vocabularies::default();

    for order in features.enabled_orders() {
        let cfg = features.order(order);

        let mut totals = GramBag::new();
        for song in train {
            totals.merge(song.borrow().extracted.grams(order));
        }

        // (count, first-seen position, gram)
        let mut ranked: Vec<(usize, usize, &str)> = totals
            .iter()
            .enumerate()
            .map(|(pos, (gram, count))| (count, pos, gram))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let drop_stopwords = features.stopwords && order == GramOrder::Unigram;
        let min_count = cfg.effective_min_count();

        let vocabulary = vocabularies.by_order.entry(order).or_default();
        for (count, _, gram) in ranked {
            if vocabulary.len() >= cfg.cap || count < min_count {
                break;
            }
            if drop_stopwords && is_stopword_or_punctuation(gram) {
                continue;
            }
            vocabulary.push(gram);
        }

        tracing::debug!(
            "Selected {} of {} {} grams from {} training songs",
            vocabulary.len(),
            totals.len(),
            order,
            train.len()
        );
    }

    vocabularies
}
