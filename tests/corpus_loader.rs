//! Loading corpora from disk.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::fs;
use std::path::Path;

use lyricgenre::corpus::Corpus;
use lyricgenre::error::Error;
use lyricgenre::types::{Genre, SongId};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn project_file_is_ordered_by_numeric_index() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics = dir.path().join("lyrics");
    write(&lyrics.join("Nas~N.Y. State of Mind"), "straight out the dungeons of rap");
    write(&lyrics.join("Dolly Parton~Jolene"), "jolene jolene");
    write(&lyrics.join("ACDC~Back in Black"), "back in black");

    let project = dir.path().join("project.json");
    write(
        &project,
        r#"{
            "10": ["ACDC", "Back in Black", "rock"],
            "2": ["Dolly Parton", "Jolene", "country"],
            "1": ["Nas", "N.Y. State of Mind", "rap"]
        }"#,
    );

    let corpus = Corpus::load_project(&project, &lyrics).unwrap();
    let genres: Vec<&str> = corpus.songs().iter().map(|s| s.genre.as_str()).collect();
    assert_eq!(genres, vec!["rap", "country", "rock"]);
    assert_eq!(corpus.songs()[1].lyrics, "jolene jolene");
    assert!(corpus.summary().missing.is_empty());
}

#[test]
fn missing_lyrics_are_skipped_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics = dir.path().join("lyrics");
    write(&lyrics.join("Outkast~Hey Ya"), "hey ya");

    let project = dir.path().join("project.json");
    write(
        &project,
        r#"{"0": ["Outkast", "Hey Ya", "rap"], "1": ["Nobody", "Lost Song", "pop"]}"#,
    );

    let corpus = Corpus::load_project(&project, &lyrics).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.summary().loaded, 1);
    assert_eq!(corpus.summary().missing, vec![SongId::new("Nobody~Lost Song")]);
}

#[test]
fn slashes_are_dropped_from_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let lyrics = dir.path().join("lyrics");
    write(&lyrics.join("ACDC~Highway to Hell"), "highway");

    let project = dir.path().join("project.json");
    write(&project, r#"{"0": ["AC/DC", "Highway to Hell", "rock"]}"#);

    let corpus = Corpus::load_project(&project, &lyrics).unwrap();
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.songs()[0].artist, "AC/DC");
}

#[test]
fn malformed_project_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project.json");
    write(&project, r#"{"0": ["only two", "fields"]}"#);
    let err = Corpus::load_project(&project, dir.path()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));

    write(&project, r#"{"first": ["a", "b", "rock"]}"#);
    let err = Corpus::load_project(&project, dir.path()).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn missing_project_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::load_project(&dir.path().join("absent.json"), dir.path()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn genre_folders_load_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("rock").join("Queen~Bohemian Rhapsody"), "is this the real life");
    write(&dir.path().join("country").join("Johnny Cash~Hurt"), "i hurt myself today");
    write(&dir.path().join("country").join("Dolly Parton~Jolene"), "jolene");
    write(&dir.path().join("stray.txt"), "not in a genre folder");

    let corpus = Corpus::load_genre_dirs(dir.path()).unwrap();
    let titles: Vec<&str> = corpus.songs().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Jolene", "Hurt", "Bohemian Rhapsody"]);
    assert_eq!(
        corpus.distribution(),
        vec![(Genre::from("country"), 2), (Genre::from("rock"), 1)]
    );
}
