//! Transcript cleaning.
//!
//! Turns disfluent speech-to-text output into readable prose. The pipeline
//! runs six stages in a fixed order; each stage feeds the next, so the order
//! changes results:
//!
//! 1. Character normalization
//! 2. Filler-word removal
//! 3. Punctuation repair and sentence capitalization
//! 4. Repeated-letter collapse ("soooo" -> "so")
//! 5. Consecutive duplicate-word removal
//! 6. Final whitespace normalization

use std::sync::LazyLock;

use lectern_common::config::{CleaningConfig, DEFAULT_FILLER_WORDS};
use lectern_common::error::{LecternError, LecternResult};
use regex::{Captures, Regex};

/// Anything that is not a word character, whitespace, or basic punctuation.
static DISALLOWED_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s\-.,!?;:'"()]"#).unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").unwrap());
static MISSING_SPACE_AFTER_PUNCT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,!?;:])(\p{L})").unwrap());
static MULTIPLE_PERIODS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());
static SENTENCE_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[.!?]\s+)(\p{Ll})").unwrap());

static DEFAULT_FILLER_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_FILLER_WORDS
        .iter()
        .map(|phrase| filler_regex(phrase).unwrap())
        .collect()
});

fn filler_regex(phrase: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
}

/// Cleans transcripts against a fixed filler vocabulary.
///
/// Holds only compiled, immutable patterns; one instance can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct TranscriptCleaner {
    fillers: Vec<Regex>,
}

impl TranscriptCleaner {
    /// Build a cleaner from the configured filler vocabulary.
    pub fn new(config: &CleaningConfig) -> LecternResult<Self> {
        let fillers = config
            .filler_words
            .iter()
            .map(|phrase| {
                if phrase.trim().is_empty() {
                    return Err(LecternError::validation("filler phrases must not be blank"));
                }
                filler_regex(phrase.trim()).map_err(|e| {
                    LecternError::config(format!("invalid filler phrase {phrase:?}: {e}"))
                })
            })
            .collect::<LecternResult<Vec<_>>>()?;
        Ok(Self { fillers })
    }

    /// A cleaner using the default filler vocabulary.
    pub fn with_defaults() -> Self {
        Self {
            fillers: DEFAULT_FILLER_REGEXES.clone(),
        }
    }

    /// Run the full cleaning pipeline.
    pub fn clean(&self, text: &str) -> String {
        tracing::debug!(chars = text.len(), "Starting transcript cleaning");

        let text = normalize_characters(text);
        tracing::debug!(chars = text.len(), "Normalized characters");

        let text = self.remove_filler_words(&text);
        tracing::debug!(chars = text.len(), "Removed filler words");

        let text = fix_punctuation(&text);
        tracing::debug!(chars = text.len(), "Fixed punctuation");

        let text = collapse_repeated_letters(&text);
        tracing::debug!(chars = text.len(), "Collapsed repeated letters");

        let text = remove_repetitions(&text);
        tracing::debug!(chars = text.len(), "Removed repeated words");

        let text = normalize_whitespace(&text);
        tracing::debug!(chars = text.len(), "Transcript cleaning completed");
        text
    }

    /// Stage 2: remove each filler phrase, in vocabulary order.
    pub fn remove_filler_words(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for filler in &self.fillers {
            cleaned = filler.replace_all(&cleaned, "").into_owned();
        }
        normalize_whitespace(&cleaned)
    }

    /// Number of filler phrases in the vocabulary.
    pub fn filler_count(&self) -> usize {
        self.fillers.len()
    }
}

impl Default for TranscriptCleaner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Clean `text` with the default filler vocabulary.
///
/// Cleaning its own output is a no-op, except when a filler is stretched:
/// "soooo" only becomes "so" in stage 4, after fillers were removed, so a
/// second pass deletes it.
pub fn clean_transcript(text: &str) -> String {
    TranscriptCleaner::with_defaults().clean(text)
}

/// Stage 1: drop unusual characters and collapse whitespace.
pub fn normalize_characters(text: &str) -> String {
    let text = DISALLOWED_CHARS_REGEX.replace_all(text, "");
    normalize_whitespace(&text)
}

/// Stage 3: tidy spacing around punctuation and capitalize sentence starts.
pub fn fix_punctuation(text: &str) -> String {
    let text = SPACE_BEFORE_PUNCT_REGEX.replace_all(text, "$1");
    let text = MISSING_SPACE_AFTER_PUNCT_REGEX.replace_all(&text, "$1 $2");
    let text = MULTIPLE_PERIODS_REGEX.replace_all(&text, ".");
    let text = SENTENCE_START_REGEX.replace_all(&text, |caps: &Captures| {
        format!("{}{}", &caps[1], caps[2].to_uppercase())
    });
    text.trim().to_string()
}

/// Stage 4: a letter repeated three or more times becomes one.
pub fn collapse_repeated_letters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run_end = i + 1;
        if c.is_alphabetic() {
            while run_end < chars.len() && same_letter(chars[run_end], c) {
                run_end += 1;
            }
        }

        if run_end - i >= 3 {
            out.push(c);
        } else {
            out.extend(&chars[i..run_end]);
        }
        i = run_end;
    }
    out
}

fn same_letter(a: char, b: char) -> bool {
    a == b || (a.is_alphabetic() && a.to_lowercase().eq(b.to_lowercase()))
}

/// Stage 5: collapse runs of the same word, keeping the first spelling.
pub fn remove_repetitions(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut previous: Option<String> = None;

    for word in text.split_whitespace() {
        let lowered = word.to_lowercase();
        if previous.as_deref() != Some(lowered.as_str()) {
            kept.push(word);
        }
        previous = Some(lowered);
    }
    kept.join(" ")
}

/// Stage 6 (and helper): single spaces, no leading or trailing whitespace.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_fillers_and_doubled_words() {
        let cleaned = clean_transcript("I I think um the the cat cat is is nice");
        assert_eq!(cleaned, "I think the cat is nice");
    }

    #[test]
    fn test_normalize_strips_symbols_keeps_punctuation() {
        let text = "Hello\u{00A0}world™ — it's \"fine\" (really)!  #tags & more…";
        assert_eq!(
            normalize_characters(text),
            "Hello world it's \"fine\" (really)! tags more"
        );
    }

    #[test]
    fn test_normalize_keeps_unicode_letters() {
        assert_eq!(normalize_characters("café  naïve"), "café naïve");
    }

    #[test]
    fn test_filler_removal_is_case_insensitive_and_word_bounded() {
        let cleaner = TranscriptCleaner::with_defaults();
        assert_eq!(
            cleaner.remove_filler_words("Um, the ummah was, UH, basically huge"),
            ", the ummah was, , huge"
        );
        // "like" inside "likely" survives.
        assert_eq!(cleaner.remove_filler_words("likely"), "likely");
    }

    #[test]
    fn test_filler_removal_runs_in_vocabulary_order() {
        // "you know" goes before "don't you know" gets a chance.
        let cleaner = TranscriptCleaner::with_defaults();
        assert_eq!(cleaner.remove_filler_words("don't you know it"), "don't it");
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = CleaningConfig {
            filler_words: vec!["hmm".to_string(), "i think".to_string()],
        };
        let cleaner = TranscriptCleaner::new(&config).unwrap();
        assert_eq!(cleaner.filler_count(), 2);
        assert_eq!(cleaner.clean("hmm I think it works"), "It works");
    }

    #[test]
    fn test_blank_filler_is_rejected() {
        let config = CleaningConfig {
            filler_words: vec!["um".to_string(), "  ".to_string()],
        };
        assert!(TranscriptCleaner::new(&config).is_err());
    }

    #[test]
    fn test_fix_punctuation() {
        assert_eq!(
            fix_punctuation("hello , world.this is it ... right ? yes"),
            "Hello, world. This is it. Right? Yes"
        );
        assert_eq!(fix_punctuation("pi is 3.14 ok"), "Pi is 3.14 ok");
    }

    #[test]
    fn test_collapse_repeated_letters() {
        assert_eq!(collapse_repeated_letters("soooo gooood"), "so god");
        assert_eq!(collapse_repeated_letters("AAAah book"), "Ah book");
        assert_eq!(collapse_repeated_letters("too 1111"), "too 1111");
    }

    #[test]
    fn test_remove_repetitions_keeps_first_casing() {
        assert_eq!(remove_repetitions("The the THE cat"), "The cat");
        assert_eq!(remove_repetitions("is is. is"), "is is. is");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "um so the the mitochondria is uh basically the powerhouse powerhouse of the cell..",
            "Hello , world.this is is a test test !  you know, it works",
            "we we need to to think about , like , gradient descent.okay",
        ];
        for input in inputs {
            let once = clean_transcript(input);
            assert_eq!(clean_transcript(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_stretched_fillers_survive_one_pass() {
        let cases = [
            ("soooo the cat sat", "So the cat sat", "The cat sat"),
            ("okaaay we start", "Okay we start", "We start"),
            ("it is riiight there", "It is right there", "It is there"),
        ];
        for (input, once, twice) in cases {
            let first = clean_transcript(input);
            assert_eq!(first, once);
            assert_eq!(clean_transcript(&first), twice);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_transcript(""), "");
        assert_eq!(clean_transcript("   \n\t "), "");
        assert_eq!(clean_transcript("um uh"), "");
    }
}
