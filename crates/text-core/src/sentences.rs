//! Sentence segmentation and paragraph re-flow for cleaned transcripts.

use std::sync::LazyLock;

use lectern_common::error::{LecternError, LecternResult};
use regex::Regex;

static SENTENCE_END_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split `text` after each `.`, `!` or `?` that is followed by whitespace.
///
/// Sentences are trimmed; empty ones are dropped. Terminal punctuation stays
/// with its sentence.
pub fn segment_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END_REGEX.find_iter(text) {
        // Punctuation marks are one byte, so this is a char boundary.
        let end = boundary.start() + 1;
        push_trimmed(&mut sentences, &text[start..end]);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Group sentences into paragraphs of at most `max_chars` characters.
///
/// Sentences are joined with one space and packed greedily. A sentence that
/// is longer than `max_chars` on its own becomes its own paragraph.
pub fn split_paragraphs(text: &str, max_chars: usize) -> LecternResult<Vec<String>> {
    if max_chars == 0 {
        return Err(LecternError::validation("max_chars must be at least 1"));
    }

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in segment_into_sentences(text) {
        let sentence_len = sentence.chars().count();
        if !current.is_empty() && current_len + 1 + sentence_len > max_chars {
            paragraphs.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current.is_empty() {
            current = sentence;
            current_len = sentence_len;
        } else {
            current.push(' ');
            current.push_str(&sentence);
            current_len += 1 + sentence_len;
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    tracing::debug!(paragraphs = paragraphs.len(), max_chars, "Split text into paragraphs");
    Ok(paragraphs)
}
