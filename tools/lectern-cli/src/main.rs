//! Lectern CLI: command-line interface for cleaning, chunking, and exporting
//! lecture transcripts.
//!
//! Usage:
//!   lectern clean <FILE>             Clean a raw transcript
//!   lectern chunk <FILE>             Split text into token/character/line chunks
//!   lectern chunk-time <SEGMENTS>    Group timed segments into chunks
//!   lectern sentences <FILE>         Print one sentence per line
//!   lectern paragraphs <FILE>        Re-flow text into paragraphs
//!   lectern export <CONTENT>         Export generated notes
//!   lectern check-audio <FILE>       Validate an audio upload
//!   lectern config                   Show or initialize configuration
//!
//! `<FILE>` may be `-` to read from stdin.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lectern_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "lectern",
    about = "Clean and chunk lecture transcripts for LLM summarization",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/lectern/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw transcript: fillers, punctuation, stutters, repeats
    Clean {
        /// Transcript file, or `-` for stdin
        file: PathBuf,

        /// Write the cleaned text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split text into bounded chunks
    Chunk {
        /// Text file, or `-` for stdin
        file: PathBuf,

        /// Chunking strategy: tokens|characters|lines
        #[arg(short, long, default_value = "tokens")]
        strategy: String,

        /// Chunk size (tokens or characters, depending on strategy)
        #[arg(long)]
        max: Option<usize>,

        /// Overlap between chunks (tokens or characters)
        #[arg(long)]
        overlap: Option<usize>,

        /// Lines per chunk for the lines strategy
        #[arg(long)]
        lines: Option<usize>,

        /// Clean the text before chunking
        #[arg(long)]
        clean: bool,

        /// Print chunks as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Group time-aligned segments (JSON, Whisper result, or JSONL) into chunks
    ChunkTime {
        /// Segments file, or `-` for stdin
        file: PathBuf,

        /// Maximum seconds of speech per chunk
        #[arg(long)]
        max_secs: Option<f64>,

        /// Print chunks as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print one sentence per line
    Sentences {
        /// Text file, or `-` for stdin
        file: PathBuf,
    },

    /// Re-flow text into paragraphs of bounded length
    Paragraphs {
        /// Text file, or `-` for stdin
        file: PathBuf,

        /// Maximum characters per paragraph
        #[arg(long)]
        max_chars: Option<usize>,
    },

    /// Export generated notes (a NoteContent JSON document)
    Export {
        /// Content JSON file, or `-` for stdin
        file: PathBuf,

        /// Output format: markdown|text|json (html and pdf need external backends)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Output directory (defaults to the configured output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name without extension (defaults to the input file stem)
        #[arg(long)]
        name: Option<String>,

        /// Also write each section to its own file
        #[arg(long)]
        sections: bool,
    },

    /// Validate an audio file for transcription
    CheckAudio {
        /// Path to the audio file
        file: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    lectern_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Clean { file, output } => commands::clean::run(&config, file, output),
        Commands::Chunk {
            file,
            strategy,
            max,
            overlap,
            lines,
            clean,
            json,
        } => commands::chunk::run(
            &config,
            file,
            commands::chunk::ChunkArgs {
                strategy,
                max,
                overlap,
                lines,
                clean,
                json,
            },
        ),
        Commands::ChunkTime {
            file,
            max_secs,
            json,
        } => commands::chunk::run_time(&config, file, max_secs, json),
        Commands::Sentences { file } => commands::sentences::run(file),
        Commands::Paragraphs { file, max_chars } => {
            commands::sentences::run_paragraphs(&config, file, max_chars)
        }
        Commands::Export {
            file,
            format,
            output,
            name,
            sections,
        } => commands::export::run(&config, file, format, output, name, sections),
        Commands::CheckAudio { file } => commands::check::run(&config, file),
        Commands::Config { init } => commands::config::run(&config, cli.config, init),
    }
}
