use bedrock_lab_bedrock_model::{BedrockConfigBuilder, BedrockProvider};
use bedrock_lab_core::retrieval::RetrievalIndex;
use bedrock_lab_core::{ChatSession, EmbeddingClient, ModelClient, RagPipeline};

use crate::config::{Config, ConfigError};

/// Builds the clients of every flow from one [`Config`].
///
/// All of them share a single HTTP client.
pub struct Lab {
    config: Config,
    provider: BedrockProvider,
}

impl Lab {
    /// Loads the configuration from its default location.
    #[inline]
    pub fn load() -> Result<Self, ConfigError> {
        Self::new(Config::load()?)
    }

    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let bedrock_config = BedrockConfigBuilder::with_api_key(config.api_key()?)
            .with_region(&config.region)
            .with_model(&config.models.chat)
            .build();
        debug!("using {bedrock_config:?}");

        Ok(Self {
            provider: BedrockProvider::new(bedrock_config),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn chat_session(&self) -> ChatSession {
        let provider = self.provider.with_model(&self.config.models.chat);
        ChatSession::new(ModelClient::new(provider), self.config.sampling.chat)
    }

    pub fn rag_pipeline(&self) -> RagPipeline {
        let embedder = self
            .provider
            .with_model(&self.config.models.embedding)
            .into_embedding_provider();
        let index = RetrievalIndex::with_metric(
            EmbeddingClient::new(embedder),
            self.config.retrieval.metric,
        );
        let generator = self.provider.with_model(&self.config.models.rag);
        RagPipeline::new(
            index,
            ModelClient::new(generator),
            self.config.sampling.rag,
            self.config.retrieval.top_k,
        )
    }

    pub fn summarizer(&self) -> ModelClient {
        ModelClient::new(self.provider.with_model(&self.config.models.summarize))
    }
}
