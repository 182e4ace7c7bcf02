//! Note generation.
//!
//! A [`Summarizer`] turns a piece of transcript into study notes. Transcripts
//! longer than the summarizer's input budget are cleaned, chunked by tokens,
//! summarized chunk by chunk, and the partial notes joined back together.

use lectern_common::config::NotesConfig;
use lectern_common::error::{LecternError, LecternResult};
use lectern_text_core::chunker::chunk_by_tokens;
use lectern_text_core::cleaner::TranscriptCleaner;
use lectern_text_core::tokens::{HeuristicTokenCounter, TokenCounter};

/// Separator between notes produced for consecutive chunks.
pub const PARTIAL_NOTES_SEPARATOR: &str = "\n\n";

/// An LLM backend that writes study notes.
pub trait Summarizer {
    /// Summarize `text` into notes.
    ///
    /// `Ok(None)` means the backend is not configured (e.g. no API key) and
    /// is not an error.
    fn summarize(&self, text: &str) -> LecternResult<Option<String>>;
}

/// Prompt asking for structured study notes from a transcript.
pub fn build_notes_prompt(text: &str) -> String {
    format!(
        "Create clear, structured study notes from this lecture transcript.\n\
         Use headings and bullet points.\n\
         \n\
         Transcript:\n\
         {text}\n"
    )
}

/// Clean, chunk, and summarize transcripts that may exceed a model's budget.
pub struct NotesPipeline {
    config: NotesConfig,
    cleaner: TranscriptCleaner,
    counter: Box<dyn TokenCounter>,
}

impl NotesPipeline {
    pub fn new(config: NotesConfig) -> Self {
        Self {
            config,
            cleaner: TranscriptCleaner::with_defaults(),
            counter: Box::new(HeuristicTokenCounter),
        }
    }

    pub fn with_cleaner(mut self, cleaner: TranscriptCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_counter(mut self, counter: Box<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Pieces of `transcript` that will be sent to the summarizer, in order.
    pub fn prepare(&self, transcript: &str) -> LecternResult<Vec<String>> {
        let text = if self.config.clean_first {
            self.cleaner.clean(transcript)
        } else {
            transcript.trim().to_string()
        };

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = self.counter.count(&text);
        if tokens <= self.config.max_input_tokens {
            return Ok(vec![text]);
        }

        tracing::info!(
            tokens,
            max_input_tokens = self.config.max_input_tokens,
            "Transcript exceeds summarizer budget, chunking"
        );
        chunk_by_tokens(
            &text,
            self.config.max_input_tokens,
            self.config.overlap_tokens,
            self.counter.as_ref(),
        )
    }

    /// Generate notes for `transcript`.
    ///
    /// Returns `Ok(None)` as soon as the summarizer reports it is not
    /// configured. An empty transcript yields empty notes without calling the
    /// summarizer.
    pub fn generate(
        &self,
        summarizer: &dyn Summarizer,
        transcript: &str,
    ) -> LecternResult<Option<String>> {
        let chunks = self.prepare(transcript)?;
        let mut partial_notes = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(chunk = index, chars = chunk.len(), "Summarizing chunk");
            let notes = summarizer.summarize(chunk).map_err(|e| match e {
                LecternError::Summarization { .. } => e,
                other => LecternError::summarization(other.to_string()),
            })?;

            match notes {
                Some(notes) => partial_notes.push(notes.trim().to_string()),
                None => {
                    tracing::warn!("Summarizer not configured, skipping note generation");
                    return Ok(None);
                }
            }
        }

        tracing::info!(chunks = chunks.len(), "Generated notes");
        Ok(Some(partial_notes.join(PARTIAL_NOTES_SEPARATOR)))
    }
}

impl Default for NotesPipeline {
    fn default() -> Self {
        Self::new(NotesConfig::default())
    }
}
