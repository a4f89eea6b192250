use bedrock_lab_model::ModelFinishReason;
use serde::{Deserialize, Serialize};

/// The preset reply for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Text of the reply.
    pub text: String,
    /// Finish reason reported with the reply.
    pub finish_reason: ModelFinishReason,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            finish_reason: ModelFinishReason::Stop,
            failures: None,
        }
    }

    /// Creates a `PresetResponse` that never succeeds.
    #[inline]
    pub fn always_failing() -> Self {
        Self::with_text("").with_failures(0)
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Marks the reply as cut off by the token limit.
    #[inline]
    pub fn truncated(mut self) -> Self {
        self.finish_reason = ModelFinishReason::MaxTokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_text("I have left a message for you.")
            .with_failures(2)
            .truncated();

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }
}
