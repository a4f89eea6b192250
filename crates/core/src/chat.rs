use bedrock_lab_model::{ModelMessage, SamplingConfig};

use crate::conversation::Conversation;
use crate::model_client::{ClientError, ModelClient};

const EXIT_COMMAND: &str = "exit";

/// Returns `true` if `input` asks to leave the chat. The whole line must
/// be the command, only letter case is ignored.
#[inline]
pub fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// The stage a [`ChatSession`] is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChatState {
    /// Waiting for the next user input.
    #[default]
    AwaitingInput,
    /// The user asked to leave. No more requests will be sent.
    Terminated,
}

/// What happened to one user input.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The model replied, and the reply was appended to the transcript.
    Reply(String),
    /// The request failed. The user message stays in the transcript,
    /// no assistant message is added.
    Failed(ClientError),
    /// The input was blank and nothing was sent.
    Skipped,
    /// The session is over.
    Exit,
}

/// A stateful chat with a text generation model.
///
/// Every turn sends the entire transcript, so the model sees everything
/// said so far. The transcript is owned by the session and dropped with
/// it.
pub struct ChatSession {
    model_client: ModelClient,
    sampling: SamplingConfig,
    conversation: Conversation,
    state: ChatState,
}

impl ChatSession {
    /// Creates a session with an empty transcript.
    #[inline]
    pub fn new(model_client: ModelClient, sampling: SamplingConfig) -> Self {
        Self {
            model_client,
            sampling,
            conversation: Default::default(),
            state: Default::default(),
        }
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Returns the transcript.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Handles one line of user input.
    pub async fn handle_input(&mut self, input: &str) -> TurnOutcome {
        if self.state == ChatState::Terminated {
            return TurnOutcome::Exit;
        }
        if is_exit_command(input) {
            debug!(
                "chat terminated after {} messages",
                self.conversation.len()
            );
            self.state = ChatState::Terminated;
            return TurnOutcome::Exit;
        }
        if input.trim().is_empty() {
            return TurnOutcome::Skipped;
        }

        self.conversation.push(ModelMessage::User(input.to_owned()));
        let request = self.conversation.to_request(self.sampling);

        match self.model_client.send_request(request).await {
            Ok(resp) => {
                self.conversation
                    .push(ModelMessage::Assistant(resp.text.clone()));
                TurnOutcome::Reply(resp.text)
            }
            Err(err) => {
                error!("error invoking model: {err}");
                TurnOutcome::Failed(err)
            }
        }
    }
}
