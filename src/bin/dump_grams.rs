//! Dump the grams, structural tags and length measures of one lyrics file.
//!
//! Usage: cargo run --bin dump_grams -- <file> [--tokenize] [--stem] [--top 20]

use std::path::PathBuf;

use anyhow::Context;
use lyricgenre::config::FeatureConfig;
use lyricgenre::lyrics::{GramExtractor, TextProcessor};
use lyricgenre::types::GramOrder;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args
        .iter()
        .enumerate()
        .find(|(i, a)| !a.starts_with("--") && (*i == 0 || args[i - 1] != "--top"))
        .map(|(_, a)| PathBuf::from(a))
        .context("Usage: dump_grams <file> [--tokenize] [--stem] [--top N]")?;
    let top: usize = args
        .iter()
        .position(|a| a == "--top")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    let features = FeatureConfig {
        tokenize: args.iter().any(|a| a == "--tokenize"),
        stem: args.iter().any(|a| a == "--stem"),
        ..FeatureConfig::default()
    };

    let lyrics = fs_err::read_to_string(&path)?;
    let extractor = GramExtractor::new(TextProcessor::new(&features));
    let extracted = extractor.extract(&lyrics);

    println!("=== {} ===", path.display());
    println!(
        "chars: {}  words: {}  unique: {}",
        extracted.length.chars, extracted.length.words, extracted.length.unique_words
    );

    println!("\n--- Tags ({}) ---", extracted.tags.len());
    for tag in &extracted.tags {
        println!("  [{tag}]");
    }
    for (category, count) in extracted.structure().iter().filter(|(_, c)| *c > 0) {
        println!("  {category:<12} {count}");
    }

    for order in GramOrder::all() {
        let bag = extracted.grams(*order);
        let mut grams: Vec<(&str, usize)> = bag.iter().collect();
        grams.sort_by(|a, b| b.1.cmp(&a.1));

        println!("\n--- {order} ({} distinct) ---", bag.len());
        for (gram, count) in grams.into_iter().take(top) {
            println!("  {count:>4}  {gram}");
        }
    }

    Ok(())
}
