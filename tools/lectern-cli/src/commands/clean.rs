//! Clean a raw transcript.

use std::path::PathBuf;

use lectern_common::config::AppConfig;
use lectern_text_core::cleaner::TranscriptCleaner;

use super::read_input;

pub fn run(config: &AppConfig, file: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = read_input(&file)?;
    let cleaner = TranscriptCleaner::new(&config.cleaning)
        .map_err(|e| anyhow::anyhow!("Invalid filler vocabulary: {e}"))?;

    let cleaned = cleaner.clean(&raw);
    tracing::info!(
        before = raw.len(),
        after = cleaned.len(),
        fillers = cleaner.filler_count(),
        "Cleaned transcript"
    );

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{cleaned}\n"))
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            println!("Cleaned transcript written to: {}", path.display());
        }
        None => println!("{cleaned}"),
    }

    Ok(())
}
