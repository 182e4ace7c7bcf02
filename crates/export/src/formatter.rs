//! Rendering of generated notes into export formats, and parsing of the
//! `Q:` / `A:` conventions the summarizer uses for quizzes and flashcards.

use std::fmt;

use chrono::{DateTime, TimeZone};
use lectern_common::error::LecternResult;
use lectern_transcript_model::content::{Flashcard, NoteContent, QuizQuestion};
use serde::Serialize;

const SECTION_RULE: &str = "---\n\n";

/// Render `content` as a markdown document.
///
/// Sections appear in a fixed order (notes, quiz, flashcards, transcript);
/// blank sections are left out.
pub fn format_markdown<Tz>(content: &NoteContent, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut md = String::from("# Lecture Notes\n\n");
    md.push_str(&format!(
        "*Generated on: {}*\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    if let Some(course) = content.course_name() {
        md.push_str(&format!("**Course:** {course}\n\n"));
    }
    if let Some(topic) = content.topic() {
        md.push_str(&format!("**Topic:** {topic}\n\n"));
    }
    md.push_str(SECTION_RULE);

    if let Some(notes) = content.notes() {
        md.push_str("## Study Notes\n\n");
        md.push_str(notes);
        md.push_str("\n\n");
        md.push_str(SECTION_RULE);
    }
    if let Some(quiz) = content.quiz() {
        md.push_str("## Quiz Questions\n\n");
        md.push_str(quiz);
        md.push_str("\n\n");
        md.push_str(SECTION_RULE);
    }
    if let Some(flashcards) = content.flashcards() {
        md.push_str("## Flashcards\n\n");
        md.push_str(flashcards);
        md.push_str("\n\n");
    }
    if let Some(transcript) = content.transcript() {
        md.push_str(SECTION_RULE);
        md.push_str("## Full Transcript\n\n");
        md.push_str(transcript);
        md.push('\n');
    }

    md
}

#[derive(Serialize)]
struct JsonExport<'a> {
    metadata: JsonMetadata<'a>,
    content: JsonSections<'a>,
}

#[derive(Serialize)]
struct JsonMetadata<'a> {
    generated_at: String,
    course: &'a str,
    topic: &'a str,
}

#[derive(Serialize)]
struct JsonSections<'a> {
    notes: &'a str,
    quiz: &'a str,
    flashcards: &'a str,
    transcript: &'a str,
}

/// Render `content` as pretty-printed JSON with a metadata header.
///
/// Missing course and topic become `"Unknown"` and `"General"`; missing
/// sections become empty strings.
pub fn format_json<Tz>(content: &NoteContent, generated_at: &DateTime<Tz>) -> LecternResult<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let export = JsonExport {
        metadata: JsonMetadata {
            generated_at: generated_at.to_rfc3339(),
            course: content.course_name().unwrap_or("Unknown"),
            topic: content.topic().unwrap_or("General"),
        },
        content: JsonSections {
            notes: content.notes().unwrap_or_default(),
            quiz: content.quiz().unwrap_or_default(),
            flashcards: content.flashcards().unwrap_or_default(),
            transcript: content.transcript().unwrap_or_default(),
        },
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Plain-text export: the transcript, or the notes when there is no transcript.
pub fn format_text(content: &NoteContent) -> String {
    content
        .transcript()
        .or_else(|| content.notes())
        .unwrap_or_default()
        .to_string()
}

/// Parse `Q:` / `A:` line pairs into flashcards.
///
/// An `A:` line without a pending non-empty question is ignored.
pub fn parse_flashcards(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut question: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(q) = line.strip_prefix("Q:") {
            question = Some(q.trim().to_string()).filter(|q| !q.is_empty());
        } else if let Some(answer) = line.strip_prefix("A:") {
            if let Some(question) = question.take() {
                cards.push(Flashcard {
                    question,
                    answer: answer.trim().to_string(),
                });
            }
        }
    }

    cards
}

/// Parse quiz text into questions.
///
/// Recognized lines: `Q:` starts a question, `A)` to `D)` are options,
/// `Correct Answer:` and `Explanation:` fill in the rest. Anything else is
/// ignored.
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    let mut questions = Vec::new();
    let mut current: Option<QuizQuestion> = None;

    for line in text.lines().map(str::trim) {
        if let Some(q) = line.strip_prefix("Q:") {
            questions.extend(current.take());
            current = Some(QuizQuestion {
                question: q.trim().to_string(),
                ..QuizQuestion::default()
            });
            continue;
        }

        let Some(question) = current.as_mut() else {
            continue;
        };

        if is_option_line(line) {
            question.options.push(line.to_string());
        } else if let Some(rest) = line.strip_prefix("Correct Answer:") {
            // Only the text up to any further colon is the answer key.
            let answer = rest.split(':').next().unwrap_or_default().trim();
            question.correct_answer = Some(answer.to_string());
        } else if let Some(rest) = line.strip_prefix("Explanation:") {
            question.explanation = Some(rest.trim().to_string());
        }
    }

    questions.extend(current);
    questions
}

fn is_option_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 1 && matches!(bytes[0], b'A'..=b'D') && bytes[1] == b')'
}
