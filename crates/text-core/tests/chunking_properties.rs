//! Property-based tests for the chunkers.

use lectern_text_core::chunker::{
    chunk_by_characters, chunk_by_lines, chunk_by_time, chunk_by_tokens, merge_character_chunks,
};
use lectern_text_core::sentences::{segment_into_sentences, split_paragraphs};
use lectern_text_core::tokens::{HeuristicTokenCounter, TokenCounter};
use lectern_transcript_model::segment::Segment;
use proptest::prelude::*;

/// Lecture-ish text: words, sentence breaks, the odd long word and non-ASCII letter.
fn transcript_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            6 => "[a-z]{1,8}",
            2 => "[a-z]{2,8}\\.",
            1 => "[a-z]{20,40}",
            1 => Just("é".to_string()),
        ],
        0..120,
    )
    .prop_map(|words| words.join(" "))
}

/// Sorted, non-overlapping segments built from gaps and durations.
fn segments_strategy() -> impl Strategy<Value = Vec<Segment>> {
    prop::collection::vec((0.0f64..5.0, 0.1f64..40.0), 0..60).prop_map(|spans| {
        let mut cursor = 0.0;
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (gap, duration))| {
                let start = cursor + gap;
                cursor = start + duration;
                Segment::new(start, cursor, format!("segment {i}"))
            })
            .collect()
    })
}

/// Property: token chunks are never empty and stay within budget, except a
/// chunk that is one word larger than the budget on its own.
#[test]
fn prop_token_chunks_respect_budget() {
    proptest!(|(text in transcript_strategy(), max_tokens in 2usize..40, overlap_pct in 0usize..100)| {
        let overlap_tokens = max_tokens * overlap_pct / 100;
        let counter = HeuristicTokenCounter;
        let chunks = chunk_by_tokens(&text, max_tokens, overlap_tokens, &counter).unwrap();

        for chunk in &chunks {
            prop_assert!(!chunk.trim().is_empty(), "empty chunk in {:?}", chunks);
            let single_word = chunk.split_whitespace().count() == 1;
            prop_assert!(
                counter.count(chunk) <= max_tokens || single_word,
                "chunk {:?} is over {} tokens",
                chunk,
                max_tokens
            );
        }
    });
}

/// Property: every word of the input survives token chunking, in order.
#[test]
fn prop_token_chunks_keep_every_word() {
    proptest!(|(text in transcript_strategy(), max_tokens in 2usize..40)| {
        let chunks = chunk_by_tokens(&text, max_tokens, 0, &HeuristicTokenCounter).unwrap();
        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split_whitespace())
            .map(|w| w.trim_end_matches('.').to_string())
            .collect();
        let original: Vec<String> = text
            .split_whitespace()
            .map(|w| w.trim_end_matches('.').to_string())
            .filter(|w| !w.is_empty())
            .collect();
        prop_assert_eq!(rejoined, original);
    });
}

/// Property: merging character chunks rebuilds the input exactly.
#[test]
fn prop_character_chunks_reconstruct_input() {
    proptest!(|(text in "[a-zé .\n]{0,400}", max_chars in 2usize..80, overlap_pct in 0usize..100)| {
        let overlap_chars = (max_chars * overlap_pct / 100).min(max_chars - 1);
        let chunks = chunk_by_characters(&text, max_chars, overlap_chars).unwrap();

        for chunk in &chunks {
            prop_assert!(chunk.chars().count() <= max_chars);
        }
        prop_assert_eq!(merge_character_chunks(&chunks, overlap_chars), text);
    });
}

/// Property: a time chunk spans at most the limit unless it holds a single segment.
#[test]
fn prop_time_chunks_respect_duration() {
    proptest!(|(segments in segments_strategy(), max_secs in 1.0f64..120.0)| {
        let chunks = chunk_by_time(&segments, max_secs).unwrap();

        let grouped: usize = chunks.iter().map(|c| c.segment_count).sum();
        prop_assert_eq!(grouped, segments.len());

        for chunk in &chunks {
            prop_assert!(
                chunk.segment_count == 1 || chunk.duration_secs() <= max_secs,
                "chunk of {} segments spans {}s (limit {}s)",
                chunk.segment_count,
                chunk.duration_secs(),
                max_secs
            );
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].start_secs <= pair[1].start_secs);
        }
    });
}

/// Property: no paragraph combines sentences beyond the limit.
#[test]
fn prop_paragraphs_respect_max_chars() {
    proptest!(|(text in transcript_strategy(), max_chars in 1usize..200)| {
        let paragraphs = split_paragraphs(&text, max_chars).unwrap();
        for paragraph in &paragraphs {
            let is_single_sentence = segment_into_sentences(paragraph).len() == 1;
            prop_assert!(paragraph.chars().count() <= max_chars || is_single_sentence);
        }
    });
}

#[test]
fn empty_input_yields_no_chunks() {
    let counter = HeuristicTokenCounter;
    assert!(chunk_by_tokens("", 100, 10, &counter).unwrap().is_empty());
    assert!(chunk_by_tokens("   ", 100, 10, &counter).unwrap().is_empty());
    assert!(chunk_by_characters("", 100, 10).unwrap().is_empty());
    assert!(chunk_by_lines("", 5).unwrap().is_empty());
    assert!(chunk_by_time(&[], 30.0).unwrap().is_empty());
    assert!(segment_into_sentences("").is_empty());
    assert!(split_paragraphs("", 100).unwrap().is_empty());
}

#[test]
fn invalid_parameters_are_rejected_even_for_empty_input() {
    let counter = HeuristicTokenCounter;
    assert!(chunk_by_tokens("", 0, 0, &counter).is_err());
    assert!(chunk_by_tokens("", 10, 10, &counter).is_err());
    assert!(chunk_by_characters("", 0, 0).is_err());
    assert!(chunk_by_characters("", 10, 12).is_err());
    assert!(chunk_by_lines("", 0).is_err());
    assert!(chunk_by_time(&[], 0.0).is_err());
    assert!(chunk_by_time(&[], f64::NAN).is_err());
}
