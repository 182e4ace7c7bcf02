//! Generated study material and the formats it can be exported to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything produced for one lecture, as handed to the export collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteContent {
    /// Study notes in markdown.
    pub notes: Option<String>,
    /// Quiz questions in `Q:` / `A)` form.
    pub quiz: Option<String>,
    /// Flashcards in `Q:` / `A:` form.
    pub flashcards: Option<String>,
    /// Cleaned transcript.
    pub transcript: Option<String>,
    pub course_name: Option<String>,
    pub topic: Option<String>,
}

impl NoteContent {
    /// True when no section carries any non-blank text.
    pub fn is_empty(&self) -> bool {
        [
            &self.notes,
            &self.quiz,
            &self.flashcards,
            &self.transcript,
        ]
        .iter()
        .all(|section| non_blank(section).is_none())
    }

    pub fn notes(&self) -> Option<&str> {
        non_blank(&self.notes)
    }

    pub fn quiz(&self) -> Option<&str> {
        non_blank(&self.quiz)
    }

    pub fn flashcards(&self) -> Option<&str> {
        non_blank(&self.flashcards)
    }

    pub fn transcript(&self) -> Option<&str> {
        non_blank(&self.transcript)
    }

    pub fn course_name(&self) -> Option<&str> {
        non_blank(&self.course_name)
    }

    pub fn topic(&self) -> Option<&str> {
        non_blank(&self.topic)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Output format for exported notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Html,
    Pdf,
    Text,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Markdown,
        ExportFormat::Html,
        ExportFormat::Pdf,
        ExportFormat::Text,
        ExportFormat::Json,
    ];

    /// File extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "text",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown export format: {0}. Use: markdown, html, pdf, text, json")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A single question/answer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A multiple-choice quiz question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    /// Option lines as written, e.g. `"A) Mitochondria"`.
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_accepts_aliases() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!(" json ".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_names_parse_back() {
        for format in ExportFormat::ALL {
            assert_eq!(format.name().parse::<ExportFormat>().unwrap(), format);
            assert_eq!(format.extension().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_blank_sections_count_as_missing() {
        let content = NoteContent {
            notes: Some("  ".to_string()),
            topic: Some("Cells".to_string()),
            ..Default::default()
        };
        assert!(content.is_empty());
        assert_eq!(content.notes(), None);
        assert_eq!(content.topic(), Some("Cells"));
    }

    #[test]
    fn test_content_deserializes_with_missing_keys() {
        let content: NoteContent = serde_json::from_str(r#"{"notes": "n"}"#).unwrap();
        assert_eq!(content.notes(), Some("n"));
        assert_eq!(content.quiz, None);
    }
}
