use bedrock_lab_model::{
    Embedding, ErrorKind, ModelFinishReason, ModelMessage, ModelRequest,
    ModelResponse, Role, TokenUsage,
};
use serde::{Deserialize, Serialize};

use crate::Error;

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// The request dialect spoken by a model, derived from its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Anthropic Claude messages API.
    Anthropic,
    /// AI21 Jamba chat API.
    Jamba,
}

impl ModelFamily {
    /// Detects the family from a model id such as
    /// `anthropic.claude-3-sonnet-20240229-v1:0`. Cross-region inference
    /// profile ids (`us.anthropic...`) are accepted as well.
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        model_id.split('.').take(2).find_map(|vendor| match vendor {
            "anthropic" => Some(ModelFamily::Anthropic),
            "ai21" => Some(ModelFamily::Jamba),
            _ => None,
        })
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvokeBody {
    Anthropic(AnthropicRequest),
    Jamba(JambaRequest),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnthropicRequest {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AnthropicMessage {
    role: Role,
    content: Vec<ContentBlock>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JambaRequest {
    messages: Vec<JambaMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JambaMessage {
    role: Role,
    content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TitanEmbeddingRequest {
    #[serde(rename = "inputText")]
    input_text: String,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct AnthropicResponse {
    pub content: Vec<ResponseBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseBlock {
    pub r#type: String,
    pub text: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct JambaResponse {
    pub choices: Vec<JambaChoice>,
    pub usage: Option<JambaUsage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct JambaChoice {
    pub message: JambaMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct JambaUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TitanEmbeddingResponse {
    pub embedding: Vec<f32>,
    #[serde(rename = "inputTextTokenCount")]
    pub input_text_token_count: Option<u32>,
}

/// Error payload returned by the service on non-2xx responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest, family: ModelFamily) -> InvokeBody {
    let sampling = req.sampling;
    match family {
        ModelFamily::Anthropic => InvokeBody::Anthropic(AnthropicRequest {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            messages: req.messages.iter().map(create_anthropic_message).collect(),
        }),
        ModelFamily::Jamba => InvokeBody::Jamba(JambaRequest {
            messages: req.messages.iter().map(create_jamba_message).collect(),
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
        }),
    }
}

#[inline]
fn create_anthropic_message(msg: &ModelMessage) -> AnthropicMessage {
    AnthropicMessage {
        role: msg.role(),
        content: vec![ContentBlock::Text {
            text: msg.content().to_owned(),
        }],
    }
}

#[inline]
fn create_jamba_message(msg: &ModelMessage) -> JambaMessage {
    JambaMessage {
        role: msg.role(),
        content: msg.content().to_owned(),
    }
}

#[inline]
pub fn create_embedding_request(text: &str) -> TitanEmbeddingRequest {
    TitanEmbeddingRequest {
        input_text: text.to_owned(),
    }
}

pub fn parse_response(
    body: &[u8],
    family: ModelFamily,
) -> Result<ModelResponse, Error> {
    match family {
        ModelFamily::Anthropic => {
            let resp: AnthropicResponse = decode(body)?;
            let Some(text) = resp.content.into_iter().next().and_then(|b| b.text)
            else {
                return Err(Error::new("response has no text content", ErrorKind::Other));
            };
            Ok(ModelResponse {
                text,
                finish_reason: resp.stop_reason.as_deref().map(|reason| {
                    match reason {
                        "end_turn" | "stop_sequence" => ModelFinishReason::Stop,
                        "max_tokens" => ModelFinishReason::MaxTokens,
                        _ => ModelFinishReason::Other,
                    }
                }),
                usage: resp.usage.map(|u| TokenUsage {
                    input_tokens: u.input_tokens,
                    output_tokens: u.output_tokens,
                }),
            })
        }
        ModelFamily::Jamba => {
            let resp: JambaResponse = decode(body)?;
            let Some(choice) = resp.choices.into_iter().next() else {
                return Err(Error::new("response has no choices", ErrorKind::Other));
            };
            Ok(ModelResponse {
                text: choice.message.content,
                finish_reason: choice.finish_reason.as_deref().map(|reason| {
                    match reason {
                        "stop" => ModelFinishReason::Stop,
                        "length" => ModelFinishReason::MaxTokens,
                        _ => ModelFinishReason::Other,
                    }
                }),
                usage: resp.usage.map(|u| TokenUsage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                }),
            })
        }
    }
}

pub fn parse_embedding_response(body: &[u8]) -> Result<Embedding, Error> {
    let resp: TitanEmbeddingResponse = decode(body)?;
    if resp.embedding.is_empty() {
        return Err(Error::new("empty embedding", ErrorKind::Other));
    }
    Ok(Embedding::new(resp.embedding))
}

/// Maps a failed HTTP exchange to an error kind.
pub fn classify_failure(status: u16, message: &str) -> ErrorKind {
    let message = message.to_ascii_lowercase();
    match status {
        429 => ErrorKind::RateLimitExceeded,
        400 if message.contains("content filter")
            || message.contains("guardrail") =>
        {
            ErrorKind::Moderated
        }
        400 | 404 | 422 => ErrorKind::InvalidRequest,
        _ => ErrorKind::Other,
    }
}

#[inline]
fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, Error> {
    serde_json::from_slice(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))
}
