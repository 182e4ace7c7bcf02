//! Split text or timed segments into chunks.

use std::path::PathBuf;

use lectern_common::config::{AppConfig, ChunkingConfig};
use lectern_text_core::chunker::{chunk_by_time, ChunkStrategyKind, TextChunker};
use lectern_text_core::cleaner::TranscriptCleaner;
use lectern_transcript_model::segment::{parse_segments, parse_segments_jsonl, Segment};

use super::read_input;

/// Options for `lectern chunk`.
pub struct ChunkArgs {
    pub strategy: String,
    pub max: Option<usize>,
    pub overlap: Option<usize>,
    pub lines: Option<usize>,
    pub clean: bool,
    pub json: bool,
}

pub fn run(config: &AppConfig, file: PathBuf, args: ChunkArgs) -> anyhow::Result<()> {
    let kind: ChunkStrategyKind = args.strategy.parse()?;
    let mut text = read_input(&file)?;

    if args.clean {
        let cleaner = TranscriptCleaner::new(&config.cleaning)?;
        text = cleaner.clean(&text);
    }

    let mut chunking = config.chunking.clone();
    apply_overrides(&mut chunking, kind, &args);
    let chunker = TextChunker::from_config(kind, &chunking);
    tracing::debug!(strategy = ?chunker.strategy(), counter = chunker.counter().name(), "Chunking");

    let chunks = chunker.chunk(&text)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    let total = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "--- chunk {}/{} ({} chars, ~{} tokens) ---",
            i + 1,
            total,
            chunk.chars().count(),
            chunker.counter().count(chunk)
        );
        println!("{chunk}");
    }
    if total == 0 {
        println!("No chunks: input is empty.");
    }

    Ok(())
}

fn apply_overrides(chunking: &mut ChunkingConfig, kind: ChunkStrategyKind, args: &ChunkArgs) {
    match kind {
        ChunkStrategyKind::Tokens => {
            chunking.max_tokens = args.max.unwrap_or(chunking.max_tokens);
            chunking.overlap_tokens = args.overlap.unwrap_or(chunking.overlap_tokens);
        }
        ChunkStrategyKind::Characters => {
            chunking.max_chars = args.max.unwrap_or(chunking.max_chars);
            chunking.overlap_chars = args.overlap.unwrap_or(chunking.overlap_chars);
        }
        ChunkStrategyKind::Lines => {
            chunking.lines_per_chunk = args.lines.or(args.max).unwrap_or(chunking.lines_per_chunk);
        }
    }
}

pub fn run_time(
    config: &AppConfig,
    file: PathBuf,
    max_secs: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let content = read_input(&file)?;
    let segments = load_segments(&content)?;
    let max_secs = max_secs.unwrap_or(config.chunking.max_duration_secs);

    let chunks = chunk_by_time(&segments, max_secs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    println!(
        "{} segments -> {} chunks (max {max_secs}s)",
        segments.len(),
        chunks.len()
    );
    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "--- chunk {} [{:.2}s - {:.2}s] {} segments ---",
            i + 1,
            chunk.start_secs,
            chunk.end_secs,
            chunk.segment_count
        );
        println!("{}", chunk.text);
    }

    Ok(())
}

/// Accept a JSON array, a Whisper-style result object, or JSONL.
fn load_segments(content: &str) -> anyhow::Result<Vec<Segment>> {
    match parse_segments(content) {
        Ok(segments) => Ok(segments),
        Err(json_err) => parse_segments_jsonl(content).map_err(|jsonl_err| {
            anyhow::anyhow!(
                "Failed to parse segments as JSON ({json_err}) or JSONL ({jsonl_err})"
            )
        }),
    }
}
