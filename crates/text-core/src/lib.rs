//! Lectern Text Core
//!
//! Prepares long lecture transcripts for a size-limited summarizer:
//! - **Cleaner:** Strip fillers, repair punctuation, collapse stutters and repeats
//! - **Chunker:** Split by token estimate, speech time, line count, or characters
//! - **Sentences:** Sentence segmentation and paragraph re-flow
//! - **Tokens:** Pluggable token counting with a lossy `chars / 4` fallback
//!
//! This crate is pure computation with no I/O and no shared mutable state.
//! All inputs are data; all outputs are data.

pub mod chunker;
pub mod cleaner;
pub mod sentences;
pub mod tokens;

pub use chunker::{
    chunk_by_characters, chunk_by_lines, chunk_by_time, chunk_by_tokens, merge_character_chunks,
    ChunkStrategy, ChunkStrategyKind, TextChunker, TimeChunk,
};
pub use cleaner::{clean_transcript, TranscriptCleaner};
pub use sentences::{segment_into_sentences, split_paragraphs};
pub use tokens::{resolve_token_counter, HeuristicTokenCounter, TokenCounter};
