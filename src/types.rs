//! Core type definitions for compile-time safety.
//!
//! Newtype wrappers keep song identifiers and genre labels from being mixed
//! with arbitrary strings, and `GramOrder` enumerates the supported n-gram orders.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::grams::NAME_SEPARATOR;

/// N-gram order of a gram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GramOrder {
    /// Single tokens.
    Unigram,
    /// Two consecutive tokens.
    Bigram,
    /// Three consecutive tokens.
    Trigram,
    /// Four consecutive tokens.
    FourGram,
    /// Five consecutive tokens.
    FiveGram,
}

impl GramOrder {
    /// Returns all orders, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Unigram, Self::Bigram, Self::Trigram, Self::FourGram, Self::FiveGram]
    }

    /// Number of tokens in a gram of this order.
    #[must_use]
    pub const fn token_count(self) -> usize {
        match self {
            Self::Unigram => 1,
            Self::Bigram => 2,
            Self::Trigram => 3,
            Self::FourGram => 4,
            Self::FiveGram => 5,
        }
    }

    /// Short name used in feature keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unigram => "uni",
            Self::Bigram => "bi",
            Self::Trigram => "tri",
            Self::FourGram => "four",
            Self::FiveGram => "five",
        }
    }

    /// Position of this order in [`GramOrder::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.token_count() - 1
    }
}

impl fmt::Display for GramOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Song identifier in `artist~title` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongId(pub String);

impl SongId {
    /// Create a new `SongId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the identifier for an artist and title, dropping path separators.
    pub fn from_artist_title(artist: &str, title: &str) -> Self {
        Self(format!(
            "{}{NAME_SEPARATOR}{}",
            artist.replace('/', ""),
            title.replace('/', "")
        ))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SongId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Genre label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Genre(pub String);

impl Genre {
    /// Create a new `Genre` from a string.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Genre {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Genre {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A song with its lyrics and genre label. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Identifier, `artist~title`.
    pub id: SongId,
    /// Performing artist, empty when unknown.
    pub artist: String,
    /// Song title.
    pub title: String,
    /// Genre label.
    pub genre: Genre,
    /// Raw lyrics text.
    pub lyrics: String,
}

impl Song {
    /// Create a song, deriving its identifier from artist and title.
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        genre: impl Into<Genre>,
        lyrics: impl Into<String>,
    ) -> Self {
        let artist = artist.into();
        let title = title.into();
        Self {
            id: SongId::from_artist_title(&artist, &title),
            artist,
            title,
            genre: genre.into(),
            lyrics: lyrics.into(),
        }
    }

    /// Display name of the song.
    pub fn name(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_id_strips_slashes() {
        let id = SongId::from_artist_title("AC/DC", "Back In Black");
        assert_eq!(id.as_str(), "ACDC~Back In Black");
    }

    #[test]
    fn gram_orders_index_their_token_count() {
        for (i, order) in GramOrder::all().iter().enumerate() {
            assert_eq!(order.index(), i);
            assert_eq!(order.token_count(), i + 1);
        }
    }
}
