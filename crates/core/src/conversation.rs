//! Conversation-related types.

use bedrock_lab_model::{ModelMessage, ModelRequest, SamplingConfig};

/// Represents a conversation: the ordered, append-only transcript of one
/// chat session.
///
/// There is no upper bound on its length, every turn is kept for as long
/// as the conversation lives.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    pub(crate) items: Vec<ModelMessage>,
}

impl Conversation {
    /// Returns the messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[ModelMessage] {
        &self.items
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the last message, if any.
    #[inline]
    pub fn last(&self) -> Option<&ModelMessage> {
        self.items.last()
    }

    pub(crate) fn push(&mut self, msg: ModelMessage) {
        self.items.push(msg);
    }

    /// Builds a request carrying the whole transcript.
    pub(crate) fn to_request(&self, sampling: SamplingConfig) -> ModelRequest {
        ModelRequest {
            messages: self.items.clone(),
            sampling,
        }
    }
}
