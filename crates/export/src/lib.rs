//! Lectern Export
//!
//! Writes generated study material to disk.
//!
//! # Pipeline Architecture
//!
//! ```text
//! NoteContent ──┐
//!               ├── RenderBackend (markdown / text / json)
//! ExportFormat ─┘         │
//!                         ▼
//!               <output_dir>/<stem>.<ext>
//! ```
//!
//! Quiz and flashcard text produced by the summarizer can be parsed back
//! into structured [`QuizQuestion`](lectern_transcript_model::content::QuizQuestion)
//! and [`Flashcard`](lectern_transcript_model::content::Flashcard) values.

pub mod export;
pub mod formatter;

pub use export::*;
pub use formatter::*;
