//! Transcript chunking.
//!
//! Splits long transcripts into pieces that fit a downstream model's input
//! budget. Four modes are supported:
//!
//! 1. **Tokens:** sentence-aware packing against a token estimate, with
//!    whole-sentence overlap between neighbours.
//! 2. **Time:** greedy grouping of time-aligned speech segments.
//! 3. **Lines:** fixed line-count partitions.
//! 4. **Characters:** fixed character windows that prefer to end on a period.
//!
//! Every mode is deterministic, covers its input without gaps (apart from the
//! overlap band), and keeps any trailing remainder as a final, smaller chunk.

use std::fmt;
use std::str::FromStr;

use lectern_common::config::ChunkingConfig;
use lectern_common::error::{LecternError, LecternResult};
use lectern_transcript_model::segment::{Seconds, Segment};
use serde::{Deserialize, Serialize};

use crate::tokens::{resolve_token_counter, HeuristicTokenCounter, TokenCounter};

/// A window shorter than this fraction of `max_chars` is never cut at a period.
const SENTENCE_BREAK_MIN_RATIO: f64 = 0.75;

/// A group of consecutive speech segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeChunk {
    /// Start of the first segment (seconds).
    pub start_secs: Seconds,
    /// Latest end among the grouped segments (seconds).
    pub end_secs: Seconds,
    /// Number of segments grouped into this chunk.
    pub segment_count: usize,
    /// Segment texts, trimmed and joined with single spaces.
    pub text: String,
}

impl TimeChunk {
    fn open(segment: &Segment) -> Self {
        let mut chunk = Self {
            start_secs: segment.start,
            end_secs: segment.end,
            segment_count: 0,
            text: String::new(),
        };
        chunk.push(segment);
        chunk
    }

    fn push(&mut self, segment: &Segment) {
        self.end_secs = self.end_secs.max(segment.end);
        self.segment_count += 1;
        let text = segment.text.trim();
        if !text.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(text);
        }
    }

    /// Wall-clock span covered by this chunk.
    pub fn duration_secs(&self) -> Seconds {
        self.end_secs - self.start_secs
    }
}

/// Split `text` into chunks of at most `max_tokens` estimated tokens.
///
/// Sentences are taken from `". "` boundaries (the period is restored on each
/// piece that lost it). A sentence too large on its own is emitted as
/// word-level sub-chunks; a single word larger than the budget becomes a
/// chunk by itself. When a chunk fills up, its last
/// `floor(n * overlap_tokens / max_tokens)` sentences seed the next chunk,
/// minus any leading ones that would push the seed plus the next sentence
/// over budget.
pub fn chunk_by_tokens(
    text: &str,
    max_tokens: usize,
    overlap_tokens: usize,
    counter: &dyn TokenCounter,
) -> LecternResult<Vec<String>> {
    validate_window("max_tokens", max_tokens, "overlap_tokens", overlap_tokens)?;

    tracing::debug!(
        max_tokens,
        overlap_tokens,
        counter = counter.name(),
        "Chunking by tokens"
    );

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for sentence in split_on_periods(text) {
        if counter.count(&sentence) > max_tokens {
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
            }
            chunks.extend(split_by_words(&sentence, max_tokens, counter));
            continue;
        }

        if !current.is_empty() && joined_tokens(&current, &sentence, counter) > max_tokens {
            chunks.push(current.join(" "));

            let keep = overlap_sentence_count(current.len(), overlap_tokens, max_tokens);
            let mut seed = current.split_off(current.len() - keep);
            while !seed.is_empty() && joined_tokens(&seed, &sentence, counter) > max_tokens {
                seed.remove(0);
            }
            current = seed;
        }

        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    tracing::info!(chunks = chunks.len(), "Created token-based chunks");
    Ok(chunks)
}

/// Group time-ordered segments into chunks spanning at most `max_duration_secs`.
///
/// A new chunk starts once a segment begins `max_duration_secs` or more after
/// the chunk's start, or would end beyond `chunk_start + max_duration_secs`.
/// Only a single segment longer than the limit can produce a longer chunk.
pub fn chunk_by_time(segments: &[Segment], max_duration_secs: f64) -> LecternResult<Vec<TimeChunk>> {
    if !max_duration_secs.is_finite() || max_duration_secs <= 0.0 {
        return Err(LecternError::validation(format!(
            "max_duration_secs must be a positive number of seconds, got {max_duration_secs}"
        )));
    }
    validate_segments(segments)?;

    tracing::debug!(max_duration_secs, segments = segments.len(), "Chunking by time");

    let mut chunks = Vec::new();
    let mut current: Option<TimeChunk> = None;

    for segment in segments {
        let fits = current.as_ref().is_some_and(|chunk| {
            segment.start - chunk.start_secs < max_duration_secs
                && segment.end - chunk.start_secs <= max_duration_secs
        });

        match current.as_mut() {
            Some(chunk) if fits => chunk.push(segment),
            _ => {
                if let Some(done) = current.replace(TimeChunk::open(segment)) {
                    chunks.push(done);
                }
            }
        }
    }
    chunks.extend(current);

    tracing::info!(chunks = chunks.len(), "Created time-based chunks");
    Ok(chunks)
}

/// Check that segment times are finite, well-formed, and ordered by start.
pub fn validate_segments(segments: &[Segment]) -> LecternResult<()> {
    for (index, segment) in segments.iter().enumerate() {
        if !segment.start.is_finite() || !segment.end.is_finite() {
            return Err(LecternError::validation(format!(
                "segment {index} has a non-finite time ({} -> {})",
                segment.start, segment.end
            )));
        }
        if segment.end < segment.start {
            return Err(LecternError::validation(format!(
                "segment {index} ends at {}s before it starts at {}s",
                segment.end, segment.start
            )));
        }
        if index > 0 && segment.start < segments[index - 1].start {
            return Err(LecternError::OrderingViolation {
                index,
                previous_start: segments[index - 1].start,
                start: segment.start,
            });
        }
    }
    Ok(())
}

/// Partition `text` into groups of `lines_per_chunk` lines.
///
/// Groups that are blank after trimming are dropped.
pub fn chunk_by_lines(text: &str, lines_per_chunk: usize) -> LecternResult<Vec<String>> {
    if lines_per_chunk == 0 {
        return Err(LecternError::validation("lines_per_chunk must be at least 1"));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = text.split('\n').collect();
    Ok(lines
        .chunks(lines_per_chunk)
        .map(|group| group.join("\n"))
        .filter(|chunk| !chunk.trim().is_empty())
        .collect())
}

/// Split `text` into windows of at most `max_chars` characters.
///
/// A window that does not reach the end of the text is cut just after its
/// last `'.'` when that period lies more than 75% of `max_chars` into the
/// window. Consecutive windows share exactly `overlap_chars` characters, and
/// chunks are returned untrimmed so [`merge_character_chunks`] can rebuild
/// the input.
pub fn chunk_by_characters(
    text: &str,
    max_chars: usize,
    overlap_chars: usize,
) -> LecternResult<Vec<String>> {
    validate_window("max_chars", max_chars, "overlap_chars", overlap_chars)?;

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + max_chars).min(len);

        if end < len {
            if let Some(boundary) = sentence_boundary(&chars[start..end], max_chars) {
                // Only take the shorter window if the next one still moves forward.
                if start + boundary > start + overlap_chars {
                    end = start + boundary;
                }
            }
        }

        chunks.push(chars[start..end].iter().collect());

        if end >= len {
            break;
        }
        start = end - overlap_chars;
    }

    tracing::info!(
        chunks = chunks.len(),
        max_chars,
        overlap_chars,
        "Created character-based chunks"
    );
    Ok(chunks)
}

/// Rebuild the original text from [`chunk_by_characters`] output.
pub fn merge_character_chunks(chunks: &[String], overlap_chars: usize) -> String {
    let mut merged = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            merged.push_str(chunk);
        } else {
            merged.extend(chunk.chars().skip(overlap_chars));
        }
    }
    merged
}

/// Offset just past the window's last period, if it is far enough in.
fn sentence_boundary(window: &[char], max_chars: usize) -> Option<usize> {
    let period = window.iter().rposition(|&c| c == '.')?;
    (period as f64 > max_chars as f64 * SENTENCE_BREAK_MIN_RATIO).then_some(period + 1)
}

fn validate_window(
    size_name: &str,
    size: usize,
    overlap_name: &str,
    overlap: usize,
) -> LecternResult<()> {
    if size == 0 {
        return Err(LecternError::validation(format!(
            "{size_name} must be at least 1"
        )));
    }
    if overlap >= size {
        return Err(LecternError::validation(format!(
            "{overlap_name} ({overlap}) must be smaller than {size_name} ({size})"
        )));
    }
    Ok(())
}

/// Split on `". "`, restoring the period each interior piece lost.
fn split_on_periods(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = text.split(". ").collect();
    let last = pieces.len().saturating_sub(1);

    pieces
        .iter()
        .enumerate()
        .filter_map(|(i, piece)| {
            let sentence = piece.trim();
            if sentence.is_empty() {
                None
            } else if i < last && !sentence.ends_with('.') {
                Some(format!("{sentence}."))
            } else {
                Some(sentence.to_string())
            }
        })
        .collect()
}

/// Pack the words of one oversized sentence into budget-sized pieces.
fn split_by_words(sentence: &str, max_tokens: usize, counter: &dyn TokenCounter) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        if !current.is_empty() && counter.count(&format!("{current} {word}")) > max_tokens {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn joined_tokens(sentences: &[String], next: &str, counter: &dyn TokenCounter) -> usize {
    let mut text = sentences.join(" ");
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(next);
    counter.count(&text)
}

/// Sentences carried into the next chunk, clamped to `[0, sentence_count]`.
fn overlap_sentence_count(sentence_count: usize, overlap_tokens: usize, max_tokens: usize) -> usize {
    if max_tokens == 0 {
        return 0;
    }
    (sentence_count.saturating_mul(overlap_tokens) / max_tokens).min(sentence_count)
}

/// Which chunker a [`TextChunker`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategyKind {
    #[default]
    Tokens,
    Characters,
    Lines,
}

impl FromStr for ChunkStrategyKind {
    type Err = LecternError;

    fn from_str(s: &str) -> LecternResult<Self> {
        match s.to_lowercase().as_str() {
            "tokens" | "token" => Ok(Self::Tokens),
            "characters" | "character" | "chars" => Ok(Self::Characters),
            "lines" | "line" => Ok(Self::Lines),
            _ => Err(LecternError::validation(format!(
                "Unknown chunking strategy: {s}. Use: tokens, characters, lines"
            ))),
        }
    }
}

impl fmt::Display for ChunkStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tokens => "tokens",
            Self::Characters => "characters",
            Self::Lines => "lines",
        };
        write!(f, "{name}")
    }
}

/// A text chunking mode with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStrategy {
    Tokens {
        max_tokens: usize,
        overlap_tokens: usize,
    },
    Characters {
        max_chars: usize,
        overlap_chars: usize,
    },
    Lines {
        lines_per_chunk: usize,
    },
}

impl ChunkStrategy {
    /// Parameters for `kind` taken from `config`.
    pub fn from_config(kind: ChunkStrategyKind, config: &ChunkingConfig) -> Self {
        match kind {
            ChunkStrategyKind::Tokens => Self::Tokens {
                max_tokens: config.max_tokens,
                overlap_tokens: config.overlap_tokens,
            },
            ChunkStrategyKind::Characters => Self::Characters {
                max_chars: config.max_chars,
                overlap_chars: config.overlap_chars,
            },
            ChunkStrategyKind::Lines => Self::Lines {
                lines_per_chunk: config.lines_per_chunk,
            },
        }
    }

    pub fn kind(&self) -> ChunkStrategyKind {
        match self {
            Self::Tokens { .. } => ChunkStrategyKind::Tokens,
            Self::Characters { .. } => ChunkStrategyKind::Characters,
            Self::Lines { .. } => ChunkStrategyKind::Lines,
        }
    }
}

/// Runs one [`ChunkStrategy`] with a chosen token counter.
pub struct TextChunker {
    strategy: ChunkStrategy,
    counter: Box<dyn TokenCounter>,
}

impl TextChunker {
    /// Create a chunker that estimates tokens with the `chars / 4` heuristic.
    pub fn new(strategy: ChunkStrategy) -> Self {
        Self {
            strategy,
            counter: Box::new(HeuristicTokenCounter),
        }
    }

    /// Create a chunker for `kind` using `config`, resolving the best
    /// available tokenizer for token-based chunking.
    pub fn from_config(kind: ChunkStrategyKind, config: &ChunkingConfig) -> Self {
        let chunker = Self::new(ChunkStrategy::from_config(kind, config));
        if kind == ChunkStrategyKind::Tokens {
            chunker.with_counter(resolve_token_counter(&config.tokenizer_model))
        } else {
            chunker
        }
    }

    /// Replace the token counter.
    pub fn with_counter(mut self, counter: Box<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn strategy(&self) -> ChunkStrategy {
        self.strategy
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Chunk `text` with the configured strategy.
    pub fn chunk(&self, text: &str) -> LecternResult<Vec<String>> {
        match self.strategy {
            ChunkStrategy::Tokens {
                max_tokens,
                overlap_tokens,
            } => chunk_by_tokens(text, max_tokens, overlap_tokens, self.counter.as_ref()),
            ChunkStrategy::Characters {
                max_chars,
                overlap_chars,
            } => chunk_by_characters(text, max_chars, overlap_chars),
            ChunkStrategy::Lines { lines_per_chunk } => chunk_by_lines(text, lines_per_chunk),
        }
    }
}
