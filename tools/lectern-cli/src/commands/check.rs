//! Check an audio file against the upload limits.

use std::path::PathBuf;

use lectern_audio_ai::transcription::{validate_audio_file, TranscriptionConfig};
use lectern_common::config::AppConfig;

pub fn run(config: &AppConfig, file: PathBuf) -> anyhow::Result<()> {
    println!("Lectern Audio Check");
    println!("{}", "=".repeat(50));
    println!("  File: {}", file.display());

    let transcription = TranscriptionConfig::from_settings(&config.transcription)?;

    match validate_audio_file(&file, &config.upload) {
        Ok(()) => {
            let size_mb = std::fs::metadata(&file)?.len() as f64 / (1024.0 * 1024.0);
            println!("[OK] Size: {size_mb:.2}MB (max {}MB)", config.upload.max_upload_mb);
            println!(
                "[OK] Format accepted ({})",
                config.upload.allowed_extensions.join(", ")
            );
            println!(
                "\nReady for transcription (model: {}, language: {}, {} Hz).",
                transcription.model.name(),
                transcription.language.as_deref().unwrap_or("auto"),
                transcription.sample_rate
            );
            Ok(())
        }
        Err(e) => {
            println!("[FAIL] {e}");
            Err(anyhow::anyhow!("Audio file is not acceptable for transcription"))
        }
    }
}
