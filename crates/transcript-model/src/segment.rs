//! Time-aligned transcript segments.
//!
//! Segments come from the transcription collaborator as `{start, end, text}`
//! records. Lectern accepts them either as a JSON array, as a Whisper-style
//! result object (`{"text": ..., "segments": [...]}`), or as JSONL with one
//! segment per line.

use serde::{Deserialize, Serialize};

/// Offset into the audio in seconds.
pub type Seconds = f64;

/// A single transcribed segment with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds.
    pub start: Seconds,
    /// End time in seconds.
    pub end: Seconds,
    /// Transcribed text.
    pub text: String,
}

impl Segment {
    pub fn new(start: Seconds, end: Seconds, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of this segment in seconds.
    pub fn duration_secs(&self) -> Seconds {
        self.end - self.start
    }
}

/// A transcript: the full text plus the segments it was assembled from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// A transcript with text only (no timing).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
        }
    }

    /// Build a transcript whose text is the trimmed segment texts joined by spaces.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, segments }
    }

    /// End of the last segment, or zero when there is no timing information.
    pub fn duration_secs(&self) -> Seconds {
        self.segments
            .iter()
            .map(|s| s.end)
            .fold(0.0, Seconds::max)
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentsDocument {
    List(Vec<Segment>),
    Transcript {
        #[serde(default)]
        text: Option<String>,
        segments: Vec<Segment>,
    },
}

/// Parse segments from a JSON array or a Whisper-style result object.
pub fn parse_segments(json: &str) -> Result<Vec<Segment>, serde_json::Error> {
    Ok(match serde_json::from_str::<SegmentsDocument>(json)? {
        SegmentsDocument::List(segments) => segments,
        SegmentsDocument::Transcript { segments, .. } => segments,
    })
}

/// Parse a whole transcript from a Whisper-style result object.
///
/// When the document has no top-level `text`, it is assembled from the segments.
pub fn parse_transcript(json: &str) -> Result<Transcript, serde_json::Error> {
    Ok(match serde_json::from_str::<SegmentsDocument>(json)? {
        SegmentsDocument::List(segments) => Transcript::from_segments(segments),
        SegmentsDocument::Transcript {
            text: Some(text),
            segments,
        } => Transcript {
            text: text.trim().to_string(),
            segments,
        },
        SegmentsDocument::Transcript {
            text: None,
            segments,
        } => Transcript::from_segments(segments),
    })
}

/// Parse segments from JSONL, skipping blank lines and `#` comments.
pub fn parse_segments_jsonl(jsonl: &str) -> Result<Vec<Segment>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize segments to JSONL format.
pub fn serialize_segments_jsonl(segments: &[Segment]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for segment in segments {
        output.push_str(&serde_json::to_string(segment)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segment_array() {
        let json = r#"[{"start":0.0,"end":2.5,"text":" Hello"},{"start":2.5,"end":4.0,"text":"world"}]"#;
        let segments = parse_segments(json).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start, 2.5);
        assert!((segments[0].duration_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_whisper_result_object() {
        let json = r#"{
            "text": " Hello world ",
            "language": "en",
            "segments": [
                {"id": 0, "start": 0.0, "end": 1.0, "text": " Hello", "avg_logprob": -0.2},
                {"id": 1, "start": 1.0, "end": 2.0, "text": " world"}
            ]
        }"#;
        let segments = parse_segments(json).unwrap();
        assert_eq!(segments.len(), 2);

        let transcript = parse_transcript(json).unwrap();
        assert_eq!(transcript.text, "Hello world");
        assert_eq!(transcript.duration_secs(), 2.0);
    }

    #[test]
    fn test_transcript_from_segments_joins_text() {
        let transcript = Transcript::from_segments(vec![
            Segment::new(0.0, 1.0, " first "),
            Segment::new(1.0, 2.0, "   "),
            Segment::new(2.0, 3.5, "second"),
        ]);
        assert_eq!(transcript.text, "first second");
        assert_eq!(transcript.duration_secs(), 3.5);
    }

    #[test]
    fn test_jsonl_roundtrip_skips_comments() {
        let segments = vec![Segment::new(0.0, 1.0, "a"), Segment::new(1.0, 2.0, "b")];
        let jsonl = format!("# whisper base\n\n{}", serialize_segments_jsonl(&segments).unwrap());
        assert_eq!(parse_segments_jsonl(&jsonl).unwrap(), segments);
    }

    #[test]
    fn test_malformed_segments_are_errors() {
        assert!(parse_segments(r#"[{"start": "soon", "end": 1.0, "text": "x"}]"#).is_err());
        assert!(parse_segments_jsonl("{\"start\":0.0}\n").is_err());
    }

    #[test]
    fn test_empty_transcript() {
        assert!(Transcript::default().is_empty());
        assert_eq!(Transcript::default().duration_secs(), 0.0);
        assert!(Transcript::from_text("  ").is_empty());
    }
}
