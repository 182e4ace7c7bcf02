//! Token counting.
//!
//! Chunk boundaries are decided on token *estimates*. The default
//! [`HeuristicTokenCounter`] assumes roughly four characters per token.
//! That is lossy: real tokenizers disagree with it by a wide margin on
//! code, numbers, and non-English text, so callers must not treat its
//! counts as exact. Enable the `tiktoken` feature for BPE counts.

/// Characters assumed per token by the heuristic counter.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimates how many model tokens a piece of text occupies.
pub trait TokenCounter: Send + Sync {
    /// Token count for `text`.
    fn count(&self, text: &str) -> usize;

    /// Whether counts come from the model's real tokenizer.
    fn is_exact(&self) -> bool {
        false
    }

    /// Counter name, for logs.
    fn name(&self) -> &str;
}

/// `chars / 4` approximation. Lossy; see the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count() / CHARS_PER_TOKEN
    }

    fn name(&self) -> &str {
        "chars/4"
    }
}

/// Exact counts from a tiktoken BPE.
#[cfg(feature = "tiktoken")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    model: String,
}

#[cfg(feature = "tiktoken")]
impl TiktokenCounter {
    /// Load the BPE used by `model` (e.g. "gpt-3.5-turbo").
    pub fn for_model(model: &str) -> lectern_common::LecternResult<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| {
            lectern_common::LecternError::config(format!("No tokenizer for model {model}: {e}"))
        })?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }
}

#[cfg(feature = "tiktoken")]
impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Pick the best available counter for `model`.
///
/// Falls back to [`HeuristicTokenCounter`] with a warning when no exact
/// tokenizer is available. The fallback is never an error.
pub fn resolve_token_counter(model: &str) -> Box<dyn TokenCounter> {
    #[cfg(feature = "tiktoken")]
    {
        match TiktokenCounter::for_model(model) {
            Ok(counter) => {
                tracing::debug!(model, "Using tiktoken counter");
                return Box::new(counter);
            }
            Err(e) => {
                tracing::warn!(model, error = %e, "Tokenizer unavailable, estimating tokens as chars/4");
            }
        }
    }

    #[cfg(not(feature = "tiktoken"))]
    tracing::warn!(
        model,
        "Built without the tiktoken feature, estimating tokens as chars/4"
    );

    Box::new(HeuristicTokenCounter)
}
