//! Lectern Transcript Model
//!
//! Defines the data contracts shared between Lectern crates:
//! - **Segments:** Time-aligned `{start, end, text}` units from speech-to-text
//! - **Transcript:** Full text plus the segments it came from
//! - **Content:** Generated notes, quiz, and flashcards, and their export formats

pub mod content;
pub mod segment;

pub use content::*;
pub use segment::*;
