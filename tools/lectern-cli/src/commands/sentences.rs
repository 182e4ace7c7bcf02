//! Sentence segmentation and paragraph re-flow.

use std::path::PathBuf;

use lectern_common::config::AppConfig;
use lectern_text_core::sentences::{segment_into_sentences, split_paragraphs};

use super::read_input;

pub fn run(file: PathBuf) -> anyhow::Result<()> {
    let text = read_input(&file)?;
    for sentence in segment_into_sentences(&text) {
        println!("{sentence}");
    }
    Ok(())
}

pub fn run_paragraphs(
    config: &AppConfig,
    file: PathBuf,
    max_chars: Option<usize>,
) -> anyhow::Result<()> {
    let text = read_input(&file)?;
    let max_chars = max_chars.unwrap_or(config.chunking.paragraph_max_chars);

    let paragraphs = split_paragraphs(&text, max_chars)?;
    println!("{}", paragraphs.join("\n\n"));
    Ok(())
}
