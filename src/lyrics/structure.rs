//! Structural tag categories (`verse`, `chorus`, ...).

use crate::constants::structure::{CATEGORIES, SYNONYMS};

/// Per-category counts of structural tag lines, in [`CATEGORIES`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureCounts {
    counts: Vec<u32>,
}

impl StructureCounts {
    /// Count tag contents against every category.
    ///
    /// Matching is by substring, so `"pre-chorus"` counts toward both
    /// `pre-chorus` and `chorus`. A tag counts at most once per category.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut counts = vec![0u32; CATEGORIES.len()];
        for tag in tags {
            let tag = tag.as_ref();
            for (idx, category) in CATEGORIES.iter().enumerate() {
                if matches_category(tag, category) {
                    counts[idx] += 1;
                }
            }
        }
        Self { counts }
    }

    /// Count for a category name; 0 for unknown names.
    pub fn get(&self, category: &str) -> u32 {
        CATEGORIES
            .iter()
            .position(|c| *c == category)
            .map_or(0, |idx| self.counts[idx])
    }

    /// Categories with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        CATEGORIES.iter().copied().zip(self.counts.iter().copied())
    }
}

fn matches_category(tag: &str, category: &str) -> bool {
    tag.contains(category)
        || SYNONYMS
            .iter()
            .any(|(synonym, target)| *target == category && tag.contains(synonym))
}
