use serde::{Deserialize, Serialize};

/// A complete reply from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text, taken from the first content block of the
    /// first choice.
    pub text: String,
    /// Why the model stopped generating, if reported.
    pub finish_reason: Option<ModelFinishReason>,
    /// Token accounting, if reported.
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    /// Creates a response that only carries text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            finish_reason: Some(ModelFinishReason::Stop),
            usage: None,
        }
    }
}

/// The reason why a model response has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The reply was cut off by the `max_tokens` limit.
    MaxTokens,
    /// Any other reason reported by the provider.
    Other,
}

/// Tokens consumed by a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub input_tokens: u32,
    /// Tokens in the reply.
    pub output_tokens: u32,
}
