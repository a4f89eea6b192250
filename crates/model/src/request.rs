use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRequest {
    /// The input messages, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Sampling parameters for this request.
    pub sampling: SamplingConfig,
}

impl ModelRequest {
    /// Creates a request containing a single user prompt.
    #[inline]
    pub fn with_prompt<S: Into<String>>(
        prompt: S,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            messages: vec![ModelMessage::User(prompt.into())],
            sampling,
        }
    }
}

/// The author of a message.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Assistant,
}

impl Role {
    /// Returns the wire name of this role.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}

impl ModelMessage {
    /// Returns the role of the message author.
    #[inline]
    pub fn role(&self) -> Role {
        match self {
            ModelMessage::User(_) => Role::User,
            ModelMessage::Assistant(_) => Role::Assistant,
        }
    }

    /// Returns the text content of the message.
    #[inline]
    pub fn content(&self) -> &str {
        match self {
            ModelMessage::User(text) | ModelMessage::Assistant(text) => text,
        }
    }
}

/// Sampling parameters sent along with every generation request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Upper bound of generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature, in `0.0..=1.0`.
    pub temperature: f32,
    /// Nucleus sampling threshold, in `0.0..=1.0`.
    pub top_p: f32,
}

impl SamplingConfig {
    /// Checks that every field is within the range accepted by the
    /// service. Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_tokens == 0 {
            return Err("max_tokens");
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("temperature");
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err("top_p");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sampling() {
        let sampling = SamplingConfig {
            max_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
        };
        assert_eq!(sampling.validate(), Ok(()));

        let no_tokens = SamplingConfig {
            max_tokens: 0,
            ..sampling
        };
        assert_eq!(no_tokens.validate(), Err("max_tokens"));

        let too_hot = SamplingConfig {
            temperature: 1.5,
            ..sampling
        };
        assert_eq!(too_hot.validate(), Err("temperature"));

        let nan_top_p = SamplingConfig {
            top_p: f32::NAN,
            ..sampling
        };
        assert_eq!(nan_top_p.validate(), Err("top_p"));
    }

    #[test]
    fn test_message_accessors() {
        let msg = ModelMessage::Assistant("Bonjour".to_owned());
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.content(), "Bonjour");
        assert_eq!(ModelMessage::User(String::new()).role().to_string(), "user");
    }
}
