//! `lyricgenre` - genre classification of song lyrics.
//!
//! Lyrics are reduced to n-gram presence, structural tag counts and length
//! flags, then classified with a Naive Bayes model. Vocabularies are selected
//! from the training partition only, and every run is reproducible from its seed.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod lyrics;
pub mod pipeline;
pub mod report;
pub mod split;
pub mod types;
