//! Lectern Audio Intelligence
//!
//! Contracts for the external collaborators around the text core:
//! - **Transcription:** Whisper-style speech-to-text behind the [`Transcriber`] trait
//! - **Upload validation:** size and container checks before any audio is touched
//! - **Notes:** budget-aware summarization of long transcripts via [`Summarizer`]

pub mod summarizer;
pub mod transcription;

pub use summarizer::*;
pub use transcription::*;
