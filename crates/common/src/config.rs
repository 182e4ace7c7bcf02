//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Filler phrases removed from transcripts by default, in removal order.
pub const DEFAULT_FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "er",
    "ah",
    "like",
    "you know",
    "basically",
    "actually",
    "literally",
    "sort of",
    "kind of",
    "i mean",
    "right",
    "okay",
    "so",
    "well",
    "you see",
    "i guess",
    "at least",
    "don't you know",
    "furthermore",
    "moreover",
    "in addition",
];

/// Audio container extensions accepted for upload.
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "flac"];

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where exported notes are written.
    pub output_dir: PathBuf,

    /// Chunk size and overlap defaults.
    pub chunking: ChunkingConfig,

    /// Transcript cleaning settings.
    pub cleaning: CleaningConfig,

    /// Upload validation limits.
    pub upload: UploadConfig,

    /// Speech-to-text settings.
    pub transcription: TranscriptionSettings,

    /// Note generation settings.
    pub notes: NotesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Chunking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Token budget per chunk for token-based chunking.
    pub max_tokens: usize,

    /// Tokens of context carried into the next chunk.
    pub overlap_tokens: usize,

    /// Maximum seconds of speech per time-based chunk.
    pub max_duration_secs: f64,

    /// Lines per chunk for line-based chunking.
    pub lines_per_chunk: usize,

    /// Characters per chunk for character-based chunking.
    pub max_chars: usize,

    /// Characters of context carried into the next chunk.
    pub overlap_chars: usize,

    /// Maximum characters per paragraph when re-flowing cleaned text.
    pub paragraph_max_chars: usize,

    /// Model whose tokenizer is used for exact counts, when available.
    pub tokenizer_model: String,
}

/// Cleaning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Filler phrases, removed in this order.
    pub filler_words: Vec<String>,
}

/// Upload validation limits for the transcription collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in megabytes.
    pub max_upload_mb: u64,

    /// Accepted extensions, lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
}

/// Speech-to-text settings, as stored in the config file.
///
/// The model is kept by name; the transcription crate parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model name ("tiny", "base", "small", "medium", "large").
    pub model: String,

    /// Language hint (ISO 639-1 code), or `None` to auto-detect.
    pub language: Option<String>,

    /// Sample rate audio is resampled to before inference.
    pub sample_rate: u32,
}

/// Note generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Largest transcript (in tokens) sent to the summarizer in one call.
    pub max_input_tokens: usize,

    /// Overlap between consecutive summarizer inputs.
    pub overlap_tokens: usize,

    /// Whether to clean the transcript before chunking.
    pub clean_first: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lectern=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            chunking: ChunkingConfig::default(),
            cleaning: CleaningConfig::default(),
            upload: UploadConfig::default(),
            transcription: TranscriptionSettings::default(),
            notes: NotesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            overlap_tokens: 200,
            max_duration_secs: 300.0,
            lines_per_chunk: 50,
            max_chars: 5000,
            overlap_chars: 500,
            paragraph_max_chars: 500,
            tokenizer_model: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            filler_words: DEFAULT_FILLER_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: 100,
            allowed_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            language: Some("en".to_string()),
            sample_rate: 16_000,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: 4000,
            overlap_tokens: 200,
            clean_first: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lectern").join("config.json")
}
