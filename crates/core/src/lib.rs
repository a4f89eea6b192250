//! Core logic of the demos: the chat loop state, the retrieval index,
//! prompt templates and the flows built on top of them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod chat;
pub mod conversation;
mod model_client;
pub mod prompt;
pub mod rag;
pub mod retrieval;
mod summarize;

pub use chat::{ChatSession, ChatState, TurnOutcome, is_exit_command};
pub use model_client::{ClientError, EmbeddingClient, ModelClient};
pub use rag::{RagAnswer, RagPipeline};
pub use summarize::summarize;
