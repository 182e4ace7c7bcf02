//! Export generated notes.

use std::path::PathBuf;

use lectern_common::config::AppConfig;
use lectern_export::export::{export_content, export_sections, ExportJob};
use lectern_transcript_model::content::{ExportFormat, NoteContent};

use super::read_input;

pub fn run(
    config: &AppConfig,
    file: PathBuf,
    format: String,
    output: Option<PathBuf>,
    name: Option<String>,
    sections: bool,
) -> anyhow::Result<()> {
    let format: ExportFormat = format.parse()?;
    let content: NoteContent = serde_json::from_str(&read_input(&file)?)
        .map_err(|e| anyhow::anyhow!("Failed to parse content {}: {e}", file.display()))?;

    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
    let stem = name.unwrap_or_else(|| default_stem(&file));

    println!("Exporting notes from: {}", file.display());
    println!("  Format: {format}");
    println!("  Output directory: {}", output_dir.display());

    let job = ExportJob::new(content, format, &output_dir, stem);
    let path = export_content(&job)?;
    println!("  Written: {}", path.display());

    if sections {
        for (section, path) in export_sections(&job.content, &output_dir, &job.stem)? {
            println!("  Section {section}: {}", path.display());
        }
    }

    Ok(())
}

fn default_stem(file: &std::path::Path) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| *s != "-")
        .unwrap_or("lecture_notes")
        .to_string()
}
