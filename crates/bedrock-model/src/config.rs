use std::fmt::Debug;

/// Region used when none is given.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Builder for [`BedrockConfig`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BedrockConfigBuilder {
    api_key: String,
    model: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
}

impl BedrockConfigBuilder {
    /// Creates a builder with the given Bedrock API key.
    #[inline]
    pub fn with_api_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            region: None,
            endpoint: None,
        }
    }

    /// Sets the model id to invoke.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the AWS region.
    #[inline]
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom runtime endpoint, overriding the one derived from
    /// the region.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> BedrockConfig {
        let region = self.region.unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let endpoint = self.endpoint.unwrap_or_else(|| {
            format!("https://bedrock-runtime.{region}.amazonaws.com")
        });
        BedrockConfig {
            api_key: self.api_key,
            model: self.model.unwrap_or_else(|| {
                "anthropic.claude-3-sonnet-20240229-v1:0".to_owned()
            }),
            region,
            endpoint,
        }
    }
}

impl Debug for BedrockConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockConfigBuilder")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Configuration for the Bedrock runtime providers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BedrockConfig {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) region: String,
    pub(crate) endpoint: String,
}

impl BedrockConfig {
    /// Returns the model id.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the AWS region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the runtime endpoint.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Debug for BedrockConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockConfig")
            .field("api_key", &"<deducted>")
            .field("model", &self.model)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
