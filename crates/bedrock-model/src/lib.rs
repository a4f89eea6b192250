//! Model providers for the Amazon Bedrock runtime `InvokeModel` API.
//!
//! Requests are authenticated with a Bedrock API key sent as a bearer
//! token. Each provider owns a [`reqwest::Client`], clones made with
//! [`BedrockProvider::with_model`] share its connection pool.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use bedrock_lab_model::{
    Embedding, EmbeddingProvider, ErrorKind, ModelFinishReason, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse,
};
use bytes::Bytes;
use mime::Mime;
use reqwest::{Client, RequestBuilder, Url, header};
use serde::Serialize;

pub use config::{BedrockConfig, BedrockConfigBuilder, DEFAULT_REGION};
pub use proto::ModelFamily;
use proto::ErrorBody;

/// Error type for the Bedrock providers.
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Text generation provider backed by Bedrock.
#[derive(Clone, Debug)]
pub struct BedrockProvider {
    client: Client,
    config: Arc<BedrockConfig>,
}

impl BedrockProvider {
    /// Creates a new `BedrockProvider` with the given configuration.
    #[inline]
    pub fn new(config: BedrockConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Returns a provider for another model that reuses this provider's
    /// HTTP client and credentials.
    pub fn with_model<S: Into<String>>(&self, model: S) -> Self {
        let mut config = BedrockConfig::clone(&self.config);
        config.model = model.into();
        Self {
            client: self.client.clone(),
            config: Arc::new(config),
        }
    }

    /// Turns this provider into an embedding provider for the same model.
    #[inline]
    pub fn into_embedding_provider(self) -> BedrockEmbeddingProvider {
        BedrockEmbeddingProvider { inner: self }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }

    fn invoke_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|err| {
            Error::new(format!("invalid endpoint: {err}"), ErrorKind::InvalidRequest)
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::new("endpoint cannot be a base", ErrorKind::InvalidRequest)
            })?
            .pop_if_empty()
            .extend(["model", self.config.model.as_str(), "invoke"]);
        Ok(url)
    }

    fn build_invoke<T: Serialize>(
        &self,
        body: &T,
    ) -> Result<RequestBuilder, Error> {
        let url = self.invoke_url()?;
        Ok(self
            .client
            .post(url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body))
    }
}

impl ModelProvider for BedrockProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let model = self.config.model.clone();
        let prepared = ModelFamily::from_model_id(&model)
            .ok_or_else(|| {
                Error::new(
                    format!("unsupported text generation model: {model}"),
                    ErrorKind::InvalidRequest,
                )
            })
            .and_then(|family| {
                let body = proto::create_request(req, family);
                Ok((family, self.build_invoke(&body)?))
            });

        async move {
            let (family, request) = prepared?;
            debug!("invoking {model} ({family:?})");
            let body = invoke(request).await?;
            let resp = proto::parse_response(&body, family)?;
            if resp.finish_reason == Some(ModelFinishReason::MaxTokens) {
                warn!("reply from {model} was truncated by max_tokens");
            }
            if let Some(usage) = resp.usage {
                debug!(
                    "{model} used {} input and {} output tokens",
                    usage.input_tokens, usage.output_tokens
                );
            }
            Ok(resp)
        }
    }
}

/// Text embedding provider backed by a Bedrock Titan embedding model.
#[derive(Clone, Debug)]
pub struct BedrockEmbeddingProvider {
    inner: BedrockProvider,
}

impl EmbeddingProvider for BedrockEmbeddingProvider {
    type Error = Error;

    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Embedding, Self::Error>> + Send + 'static
    {
        let request = self
            .inner
            .build_invoke(&proto::create_embedding_request(text));
        let model = self.inner.config.model.clone();

        async move {
            let request = request?;
            trace!("embedding with {model}");
            let body = invoke(request).await?;
            proto::parse_embedding_response(&body)
        }
    }
}

/// Sends a prepared `InvokeModel` request and returns the raw JSON body.
async fn invoke(request: RequestBuilder) -> Result<Bytes, Error> {
    let resp = request
        .send()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
        let kind = proto::classify_failure(status.as_u16(), &message);
        error!("bedrock returned {status}: {message}");
        return Err(Error::new(format!("{status}: {message}"), kind));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let is_json = content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| m.subtype() == mime::JSON)
        .unwrap_or(false);
    if !is_json {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::Other,
        ));
    }

    resp.bytes()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))
}

#[cfg(test)]
mod tests {
    use bedrock_lab_model::SamplingConfig;

    use super::*;

    fn provider() -> BedrockProvider {
        BedrockProvider::new(
            BedrockConfigBuilder::with_api_key("xxx")
                .with_model("anthropic.claude-3-sonnet-20240229-v1:0")
                .build(),
        )
    }

    #[test]
    fn test_invoke_url() {
        let url = provider().invoke_url().unwrap();
        assert_eq!(url.host_str(), Some("bedrock-runtime.us-east-1.amazonaws.com"));
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "model");
        assert!(segments[1].starts_with("anthropic.claude-3-sonnet-20240229-v1"));
        assert_eq!(segments[2], "invoke");
    }

    #[test]
    fn test_with_model_keeps_credentials() {
        let base = provider();
        let embedder = base.with_model("amazon.titan-embed-text-v2:0");
        assert_eq!(embedder.config().model(), "amazon.titan-embed-text-v2:0");
        assert_eq!(embedder.config().region(), base.config().region());
        assert_eq!(base.config().model(), "anthropic.claude-3-sonnet-20240229-v1:0");
    }

    #[tokio::test]
    async fn test_unsupported_model_fails_early() {
        let provider = provider().with_model("amazon.titan-embed-text-v2:0");
        let req = ModelRequest::with_prompt(
            "Hello",
            SamplingConfig {
                max_tokens: 16,
                temperature: 0.0,
                top_p: 1.0,
            },
        );
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let provider = BedrockProvider::new(
            BedrockConfigBuilder::with_api_key("xxx")
                .with_endpoint("not a url")
                .build(),
        )
        .into_embedding_provider();
        let err = provider.embed("Hello").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
