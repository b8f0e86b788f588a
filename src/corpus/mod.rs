//! Corpus loading.
//!
//! Two on-disk layouts are supported:
//! - a project file, a JSON object `{ "<index>": [artist, title, genre] }`, plus a
//!   lyrics folder holding one file per song named `artist~title`;
//! - a folder per genre, each holding one lyrics file per song.
//!
//! Songs whose lyrics file is missing are left out and listed in the
//! [`LoadSummary`]; loading continues.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use walkdir::WalkDir;

use crate::constants::grams::NAME_SEPARATOR;
use crate::error::{Error, Result};
use crate::types::{Genre, Song, SongId};

/// Outcome of loading a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Songs loaded with lyrics.
    pub loaded: usize,
    /// Songs listed but without a lyrics file.
    pub missing: Vec<SongId>,
}

/// Ordered songs with their load summary.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    songs: Vec<Song>,
    summary: LoadSummary,
}

impl Corpus {
    /// Corpus of in-memory songs.
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let summary = LoadSummary { loaded: songs.len(), missing: Vec::new() };
        Self { songs, summary }
    }

    /// Load a project file and the lyrics it references.
    pub fn load_project(project_file: &Path, lyrics_dir: &Path) -> Result<Self> {
        let start = Instant::now();
        let raw = fs_err::read_to_string(project_file)?;
        let entries: BTreeMap<String, (String, String, String)> = serde_json::from_str(&raw)
            .map_err(|e| Error::parse(e.to_string(), project_file.to_path_buf()))?;

        let mut indexed = entries
            .into_iter()
            .map(|(key, entry)| {
                key.trim()
                    .parse::<u64>()
                    .map(|idx| (idx, entry))
                    .map_err(|_| Error::parse(format!("Entry key {key:?} is not an index"), project_file.to_path_buf()))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(idx, _)| *idx);

        let mut corpus = Self::default();
        for (_, (artist, title, genre)) in indexed {
            let id = SongId::from_artist_title(&artist, &title);
            let path = lyrics_dir.join(id.as_str());
            match read_lyrics(&path)? {
                Some(lyrics) => corpus.songs.push(Song::new(artist, title, genre, lyrics)),
                None => {
                    tracing::warn!("No lyrics for {id} at {}", path.display());
                    corpus.summary.missing.push(id);
                }
            }
        }
        corpus.summary.loaded = corpus.songs.len();

        tracing::info!(
            "Loaded {} songs ({} missing) from {} in {:?}",
            corpus.summary.loaded,
            corpus.summary.missing.len(),
            project_file.display(),
            start.elapsed()
        );
        Ok(corpus)
    }

    /// Load `<root>/<genre>/<song>` files, genres and songs in name order.
    pub fn load_genre_dirs(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::Corpus(format!(
                "Genre folder root does not exist or is not a directory: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        let mut songs = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let Some(genre) = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|s| s.to_str())
            else {
                continue;
            };
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            let (artist, title) = name.split_once(NAME_SEPARATOR).unwrap_or(("", name));
            let lyrics = fs_err::read_to_string(path)?;
            songs.push(Song::new(artist, title, genre, lyrics));
        }

        tracing::info!("Loaded {} songs from {} in {:?}", songs.len(), root.display(), start.elapsed());
        Ok(Self::from_songs(songs))
    }

    /// Keep only songs of the listed genres. An empty list keeps everything.
    pub fn retain_genres(&mut self, genres: &[Genre]) {
        if genres.is_empty() {
            return;
        }
        self.songs.retain(|s| genres.contains(&s.genre));
    }

    /// Keep at most `n` songs per genre, the first ones in load order.
    pub fn limit_per_genre(&mut self, n: usize) {
        let mut seen: HashMap<Genre, usize> = HashMap::new();
        self.songs.retain(|s| {
            let count = seen.entry(s.genre.clone()).or_insert(0);
            *count += 1;
            *count <= n
        });
    }

    /// Songs per genre, in lexical genre order.
    pub fn distribution(&self) -> Vec<(Genre, usize)> {
        let mut counts: BTreeMap<&Genre, usize> = BTreeMap::new();
        for song in &self.songs {
            *counts.entry(&song.genre).or_insert(0) += 1;
        }
        counts.into_iter().map(|(g, c)| (g.clone(), c)).collect()
    }

    /// Songs in load order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Load summary.
    pub const fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    /// Number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// True when no songs are loaded.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// Lyrics file contents; `None` when the file does not exist.
fn read_lyrics(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs_err::read_to_string(path)
        .map(Some)
        .map_err(|e| Error::io(e, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::from_songs(vec![
            Song::new("a", "1", "pop", "x"),
            Song::new("b", "2", "rap", "x"),
            Song::new("c", "3", "pop", "x"),
            Song::new("d", "4", "rock", "x"),
            Song::new("e", "5", "pop", "x"),
        ])
    }

    #[test]
    fn distribution_is_sorted_by_genre() {
        let dist = corpus().distribution();
        assert_eq!(
            dist,
            vec![(Genre::from("pop"), 3), (Genre::from("rap"), 1), (Genre::from("rock"), 1)]
        );
    }

    #[test]
    fn retain_genres_filters() {
        let mut c = corpus();
        c.retain_genres(&[Genre::from("rap"), Genre::from("rock")]);
        assert_eq!(c.len(), 2);

        let mut c = corpus();
        c.retain_genres(&[]);
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn limit_keeps_first_songs_of_each_genre() {
        let mut c = corpus();
        c.limit_per_genre(2);
        let titles: Vec<&str> = c.songs().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = Corpus::load_genre_dirs(Path::new("/tmp/nonexistent_lyricgenre_corpus_dir"));
        assert!(matches!(result, Err(Error::Corpus(_))));
    }
}
