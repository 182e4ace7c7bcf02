//! Speech-to-text collaborator.
//!
//! Lectern does not run inference itself. A [`Transcriber`] implementation
//! (a local Whisper binding, a hosted API, a test double) is handed in, and
//! [`transcribe`] wraps it with upload validation and error mapping.

use std::path::Path;

use lectern_common::config::{TranscriptionSettings, UploadConfig};
use lectern_common::error::{LecternError, LecternResult};
use lectern_transcript_model::segment::{Seconds, Segment, Transcript};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Whisper model size selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhisperModel {
    /// Fastest, least accurate (~39 MB).
    Tiny,
    /// Good balance of speed and accuracy (~142 MB).
    #[default]
    Base,
    /// Better accuracy, slower (~466 MB).
    Small,
    /// High accuracy (~1.5 GB).
    Medium,
    /// Best accuracy, slowest (~2.9 GB).
    Large,
}

impl WhisperModel {
    /// Model name as Whisper tooling spells it.
    pub fn name(&self) -> &'static str {
        match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        }
    }
}

impl std::str::FromStr for WhisperModel {
    type Err = LecternError;

    fn from_str(s: &str) -> LecternResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(LecternError::validation(format!(
                "Unknown Whisper model: {s}. Use: tiny, base, small, medium, large"
            ))),
        }
    }
}

/// Configuration for transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Model to use.
    pub model: WhisperModel,

    /// Language hint (ISO 639-1 code, e.g., "en").
    pub language: Option<String>,

    /// Sample rate audio is resampled to before inference.
    pub sample_rate: u32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: WhisperModel::Base,
            language: Some("en".to_string()),
            sample_rate: 16_000,
        }
    }
}

impl TranscriptionConfig {
    /// Build from the settings section of the application config.
    pub fn from_settings(settings: &TranscriptionSettings) -> LecternResult<Self> {
        if settings.sample_rate == 0 {
            return Err(LecternError::config("transcription sample_rate must be positive"));
        }
        Ok(Self {
            model: settings.model.parse()?,
            language: settings
                .language
                .as_deref()
                .map(str::trim)
                .filter(|lang| !lang.is_empty())
                .map(str::to_string),
            sample_rate: settings.sample_rate,
        })
    }
}

/// Result of a transcription job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcript text.
    pub text: String,
    /// Time-aligned segments, when the backend reports them.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Detected or requested language.
    pub language: Option<String>,
}

impl TranscriptionResult {
    /// Total audio covered by the segments.
    pub fn duration_secs(&self) -> Seconds {
        self.segments.iter().map(|s| s.end).fold(0.0, Seconds::max)
    }

    /// Convert into a [`Transcript`], trimming the text.
    pub fn into_transcript(self) -> Transcript {
        Transcript {
            text: self.text.trim().to_string(),
            segments: self.segments,
        }
    }
}

/// A speech-to-text backend.
pub trait Transcriber {
    /// Transcribe the audio at `path`.
    fn transcribe(
        &self,
        path: &Path,
        config: &TranscriptionConfig,
    ) -> LecternResult<TranscriptionResult>;
}

/// Validate `audio_path` and run it through `transcriber`.
///
/// Upload problems surface as validation or not-found errors; anything the
/// backend reports becomes a transcription error.
pub fn transcribe(
    transcriber: &dyn Transcriber,
    audio_path: &Path,
    config: &TranscriptionConfig,
    upload: &UploadConfig,
) -> LecternResult<TranscriptionResult> {
    validate_audio_file(audio_path, upload)?;

    tracing::info!(
        path = %audio_path.display(),
        model = config.model.name(),
        "Starting transcription"
    );

    let result = transcriber
        .transcribe(audio_path, config)
        .map_err(|e| match e {
            LecternError::Transcription { .. } => e,
            other => LecternError::transcription(other.to_string()),
        })?;

    tracing::info!(
        chars = result.text.len(),
        segments = result.segments.len(),
        "Transcription completed"
    );
    Ok(result)
}

/// Check that an uploaded audio file exists, is small enough, and has an
/// accepted container extension.
pub fn validate_audio_file(path: &Path, upload: &UploadConfig) -> LecternResult<()> {
    if !path.exists() {
        return Err(LecternError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > upload.max_upload_mb.saturating_mul(BYTES_PER_MB) {
        return Err(LecternError::validation(format!(
            "File too large: {:.2}MB (max: {}MB)",
            size_bytes as f64 / BYTES_PER_MB as f64,
            upload.max_upload_mb
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !upload
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        return Err(LecternError::validation(format!(
            "Unsupported format: .{extension} (allowed: {})",
            upload.allowed_extensions.join(", ")
        )));
    }

    tracing::debug!(path = %path.display(), size_bytes, "Audio file accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedTranscriber;

    impl Transcriber for FixedTranscriber {
        fn transcribe(
            &self,
            _path: &Path,
            config: &TranscriptionConfig,
        ) -> LecternResult<TranscriptionResult> {
            Ok(TranscriptionResult {
                text: " hello there ".to_string(),
                segments: vec![
                    Segment::new(0.0, 1.5, "hello"),
                    Segment::new(1.5, 2.25, "there"),
                ],
                language: config.language.clone(),
            })
        }
    }

    struct BrokenTranscriber;

    impl Transcriber for BrokenTranscriber {
        fn transcribe(
            &self,
            _path: &Path,
            _config: &TranscriptionConfig,
        ) -> LecternResult<TranscriptionResult> {
            Err(std::io::Error::other("ffmpeg not found").into())
        }
    }

    fn temp_audio(name: &str, bytes: usize) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "lectern-audio-{}-{name}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; bytes]).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = TranscriptionConfig::default();
        assert_eq!(config.model, WhisperModel::Base);
        assert_eq!(config.language.as_deref(), Some("en"));
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!("LARGE".parse::<WhisperModel>().unwrap(), WhisperModel::Large);
        assert!("huge".parse::<WhisperModel>().is_err());
    }

    #[test]
    fn test_config_from_settings() {
        let config = TranscriptionConfig::from_settings(&TranscriptionSettings::default()).unwrap();
        assert_eq!(config, TranscriptionConfig::default());

        let settings = TranscriptionSettings {
            model: "Tiny".to_string(),
            language: Some("  ".to_string()),
            sample_rate: 8_000,
        };
        let config = TranscriptionConfig::from_settings(&settings).unwrap();
        assert_eq!(config.model, WhisperModel::Tiny);
        assert_eq!(config.language, None);
        assert_eq!(config.sample_rate, 8_000);

        let unknown = TranscriptionSettings {
            model: "huge".to_string(),
            ..TranscriptionSettings::default()
        };
        assert!(TranscriptionConfig::from_settings(&unknown).is_err());

        let silent = TranscriptionSettings {
            sample_rate: 0,
            ..TranscriptionSettings::default()
        };
        assert!(matches!(
            TranscriptionConfig::from_settings(&silent).unwrap_err(),
            LecternError::Config { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = validate_audio_file(Path::new("/no/such/lecture.mp3"), &UploadConfig::default())
            .unwrap_err();
        assert!(matches!(err, LecternError::FileNotFound { .. }));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let (dir, path) = temp_audio("lecture.MP3", 16);
        assert!(validate_audio_file(&path, &UploadConfig::default()).is_ok());
        std::fs::remove_dir_all(&dir).ok();

        let (dir, path) = temp_audio("lecture.aiff", 16);
        let err = validate_audio_file(&path, &UploadConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported format"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let (dir, path) = temp_audio("big.wav", 2 * 1024 * 1024);
        let upload = UploadConfig {
            max_upload_mb: 1,
            ..UploadConfig::default()
        };
        let err = validate_audio_file(&path, &upload).unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("File too large"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_transcribe_delegates_after_validation() {
        let (dir, path) = temp_audio("talk.wav", 64);
        let result = transcribe(
            &FixedTranscriber,
            &path,
            &TranscriptionConfig::default(),
            &UploadConfig::default(),
        )
        .unwrap();
        assert_eq!(result.duration_secs(), 2.25);
        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(result.into_transcript().text, "hello there");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_backend_failures_become_transcription_errors() {
        let (dir, path) = temp_audio("talk.flac", 64);
        let err = transcribe(
            &BrokenTranscriber,
            &path,
            &TranscriptionConfig::default(),
            &UploadConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LecternError::Transcription { .. }));
        assert!(err.to_string().contains("ffmpeg not found"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
