use std::pin::Pin;
use std::sync::Arc;

use bedrock_lab_model::{
    Embedding, EmbeddingProvider, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse,
};
use tracing::Instrument;

/// A type-erased provider error.
pub type ClientError = Box<dyn ModelProviderError>;

type SendRequestResult = Result<ModelResponse, ClientError>;
type EmbedResult = Result<Embedding, ClientError>;
type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedFuture<SendRequestResult> + Send + Sync>;
type EmbedFn = Arc<dyn Fn(&str) -> BoxedFuture<EmbedResult> + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    /// Wraps a text generation provider.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let message_count = req.messages.len();
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("sending {message_count} messages");
                    let resp = fut.await.map_err(|err| {
                        error!("got an error: {err:?}");
                        Box::new(err) as ClientError
                    })?;
                    trace!("finished a request");
                    Ok(resp)
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete reply.
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

/// The embedding counterpart of [`ModelClient`].
#[derive(Clone)]
pub struct EmbeddingClient {
    embed_fn: EmbedFn,
}

impl EmbeddingClient {
    /// Wraps an embedding provider.
    #[inline]
    pub fn new<P: EmbeddingProvider + 'static>(provider: P) -> Self {
        let embed_fn: EmbedFn = Arc::new(move |text| {
            let text_len = text.len();
            let fut = provider.embed(text);
            Box::pin(
                async move {
                    trace!("embedding {text_len} bytes of text");
                    fut.await.map_err(|err| {
                        error!("got an error: {err:?}");
                        Box::new(err) as ClientError
                    })
                }
                .instrument(trace_span!("embedding client req")),
            )
        });
        Self { embed_fn }
    }

    /// Computes the embedding of `text`. Every call reaches the provider.
    #[inline]
    pub async fn embed(&self, text: &str) -> EmbedResult {
        (self.embed_fn)(text).await
    }
}

#[cfg(test)]
mod tests {
    use bedrock_lab_model::{ErrorKind, SamplingConfig};
    use bedrock_lab_test_model::{
        PresetResponse, TestEmbeddingProvider, TestModelProvider,
    };

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest::with_prompt(
            "Hi",
            SamplingConfig {
                max_tokens: 32,
                temperature: 0.7,
                top_p: 0.9,
            },
        )
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut model_provider = TestModelProvider::default();
        for _ in 0..3 {
            model_provider.add_response(PresetResponse::with_text("How are you?"));
        }
        let model_client = ModelClient::new(model_provider.clone());

        for _ in 0..3 {
            let resp = model_client.send_request(request()).await.unwrap();
            assert_eq!(resp.text, "How are you?");
        }
        assert_eq!(model_provider.request_count(), 3);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        let model_client = ModelClient::new(model_provider);
        let err = model_client.send_request(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }

    #[tokio::test]
    async fn test_embed_is_not_cached() {
        let provider = TestEmbeddingProvider::default();
        let client = EmbeddingClient::new(provider.clone());
        let a = client.embed("same text").await.unwrap();
        let b = client.embed("same text").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(provider.call_count(), 2);
    }
}
