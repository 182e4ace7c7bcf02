//! Export jobs and render backends.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use lectern_common::error::{LecternError, LecternResult};
use lectern_transcript_model::content::{ExportFormat, NoteContent};

use crate::formatter::{format_json, format_markdown, format_text};

/// A single export ready to be rendered and written.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Content to export.
    pub content: NoteContent,

    /// Target format.
    pub format: ExportFormat,

    /// Directory the file is written into (created if missing).
    pub output_dir: PathBuf,

    /// File name without extension.
    pub stem: String,

    /// Timestamp stamped into the document.
    pub generated_at: DateTime<Local>,
}

impl ExportJob {
    pub fn new(
        content: NoteContent,
        format: ExportFormat,
        output_dir: impl Into<PathBuf>,
        stem: impl Into<String>,
    ) -> Self {
        Self {
            content,
            format,
            output_dir: output_dir.into(),
            stem: stem.into(),
            generated_at: Local::now(),
        }
    }

    /// Where the rendered file lands: `<output_dir>/<stem>.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.stem, self.format.extension()))
    }
}

/// Turns note content into the bytes of one export format.
pub trait RenderBackend {
    /// Render the job's content.
    fn render(&self, job: &ExportJob) -> LecternResult<Vec<u8>>;

    /// Whether this backend can produce `format`.
    fn supports(&self, format: ExportFormat) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Built-in backend for the text formats: markdown, plain text, and JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl RenderBackend for TextBackend {
    fn render(&self, job: &ExportJob) -> LecternResult<Vec<u8>> {
        let rendered = match job.format {
            ExportFormat::Markdown => format_markdown(&job.content, &job.generated_at),
            ExportFormat::Text => format_text(&job.content),
            ExportFormat::Json => format_json(&job.content, &job.generated_at)?,
            ExportFormat::Html | ExportFormat::Pdf => {
                return Err(unsupported_format(job.format));
            }
        };
        Ok(rendered.into_bytes())
    }

    fn supports(&self, format: ExportFormat) -> bool {
        matches!(
            format,
            ExportFormat::Markdown | ExportFormat::Text | ExportFormat::Json
        )
    }

    fn name(&self) -> &str {
        "text"
    }
}

fn unsupported_format(format: ExportFormat) -> LecternError {
    LecternError::unsupported(format!(
        "{format} export needs a rendering backend that is not built in"
    ))
}

/// Export with the built-in [`TextBackend`].
///
/// Returns the path of the written file.
pub fn export_content(job: &ExportJob) -> LecternResult<PathBuf> {
    export_with(&TextBackend, job)
}

/// Export with an explicit backend.
pub fn export_with(backend: &dyn RenderBackend, job: &ExportJob) -> LecternResult<PathBuf> {
    validate_job(job)?;
    if !backend.supports(job.format) {
        return Err(unsupported_format(job.format));
    }

    let output_path = job.output_path();
    tracing::info!(
        output = %output_path.display(),
        format = %job.format,
        backend = backend.name(),
        "Starting export"
    );

    let bytes = backend.render(job)?;
    write_file(&output_path, &bytes)?;

    tracing::info!(output = %output_path.display(), bytes = bytes.len(), "Export complete");
    Ok(output_path)
}

/// Export the same content in several formats.
///
/// Every format is checked before anything is written, so an unsupported
/// format leaves the output directory untouched.
pub fn export_formats(
    content: &NoteContent,
    output_dir: &Path,
    stem: &str,
    formats: &[ExportFormat],
) -> LecternResult<Vec<(ExportFormat, PathBuf)>> {
    let backend = TextBackend;
    if let Some(format) = formats.iter().find(|f| !backend.supports(**f)) {
        return Err(unsupported_format(*format));
    }

    formats
        .iter()
        .map(|&format| {
            let job = ExportJob::new(content.clone(), format, output_dir, stem);
            export_with(&backend, &job).map(|path| (format, path))
        })
        .collect()
}

/// Write each non-blank section to its own file.
///
/// Notes, quiz, and flashcards go to `<stem>_<section>.md`; the transcript goes
/// to `<stem>_transcript.txt`.
pub fn export_sections(
    content: &NoteContent,
    output_dir: &Path,
    stem: &str,
) -> LecternResult<Vec<(&'static str, PathBuf)>> {
    validate_stem(stem)?;

    let sections = [
        ("notes", content.notes(), "md"),
        ("quiz", content.quiz(), "md"),
        ("flashcards", content.flashcards(), "md"),
        ("transcript", content.transcript(), "txt"),
    ];

    let mut written = Vec::new();
    for (name, body, extension) in sections {
        let Some(body) = body else { continue };
        let path = output_dir.join(format!("{stem}_{name}.{extension}"));
        write_file(&path, body.as_bytes())?;
        tracing::info!(section = name, output = %path.display(), "Section exported");
        written.push((name, path));
    }

    Ok(written)
}

fn validate_job(job: &ExportJob) -> LecternResult<()> {
    validate_stem(&job.stem)?;
    if job.content.is_empty() {
        return Err(LecternError::validation(
            "Nothing to export: notes, quiz, flashcards, and transcript are all empty",
        ));
    }
    Ok(())
}

fn validate_stem(stem: &str) -> LecternResult<()> {
    if stem.trim().is_empty() {
        return Err(LecternError::validation("Export file name must not be empty"));
    }
    if stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(LecternError::validation(format!(
            "Export file name must not be a path: {stem}"
        )));
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> LecternResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            LecternError::export(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| LecternError::export(format!("Failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lectern-export-{}-{name}", std::process::id()))
    }

    fn content() -> NoteContent {
        NoteContent {
            notes: Some("- Mitochondria make ATP".to_string()),
            flashcards: Some("Q: ATP?\nA: Energy".to_string()),
            transcript: Some("Today we cover cells.".to_string()),
            topic: Some("Cells".to_string()),
            ..NoteContent::default()
        }
    }

    #[test]
    fn test_export_markdown_writes_file() {
        let dir = temp_dir("md");
        let job = ExportJob::new(content(), ExportFormat::Markdown, &dir, "lecture");
        let path = export_content(&job).unwrap();

        assert_eq!(path, dir.join("lecture.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Lecture Notes"));
        assert!(written.contains("**Topic:** Cells"));
        assert!(written.contains("## Full Transcript\n\nToday we cover cells."));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_text_and_json() {
        let dir = temp_dir("txt-json");
        let text = export_content(&ExportJob::new(content(), ExportFormat::Text, &dir, "l")).unwrap();
        assert_eq!(std::fs::read_to_string(text).unwrap(), "Today we cover cells.");

        let json = export_content(&ExportJob::new(content(), ExportFormat::Json, &dir, "l")).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(value["metadata"]["topic"], "Cells");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_html_and_pdf_are_unsupported() {
        let dir = temp_dir("unsupported");
        for format in [ExportFormat::Html, ExportFormat::Pdf] {
            let err = export_content(&ExportJob::new(content(), format, &dir, "l")).unwrap_err();
            assert!(matches!(err, LecternError::Unsupported { .. }));
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_bad_jobs_are_rejected_before_writing() {
        let dir = temp_dir("bad");
        let empty = ExportJob::new(NoteContent::default(), ExportFormat::Markdown, &dir, "l");
        assert!(export_content(&empty).unwrap_err().is_input_error());

        let escaping = ExportJob::new(content(), ExportFormat::Markdown, &dir, "../evil");
        assert!(export_content(&escaping).unwrap_err().is_input_error());

        assert!(!dir.exists());
    }

    #[test]
    fn test_export_formats_checks_all_formats_first() {
        let dir = temp_dir("multi");
        let err = export_formats(
            &content(),
            &dir,
            "l",
            &[ExportFormat::Markdown, ExportFormat::Pdf],
        )
        .unwrap_err();
        assert!(matches!(err, LecternError::Unsupported { .. }));
        assert!(!dir.exists());

        let written = export_formats(
            &content(),
            &dir,
            "l",
            &[ExportFormat::Markdown, ExportFormat::Json],
        )
        .unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1], (ExportFormat::Json, dir.join("l.json")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_sections_skips_blank_sections() {
        let dir = temp_dir("sections");
        let written = export_sections(&content(), &dir, "bio").unwrap();
        let names: Vec<_> = written.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["notes", "flashcards", "transcript"]);
        assert_eq!(
            std::fs::read_to_string(dir.join("bio_transcript.txt")).unwrap(),
            "Today we cover cells."
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
