//! Retrieval-augmented generation on top of a [`RetrievalIndex`].

use std::error::Error as StdError;
use std::fmt::{self, Display};

use bedrock_lab_model::{ErrorKind, ModelRequest, SamplingConfig};

use crate::model_client::{ClientError, ModelClient};
use crate::prompt;
use crate::retrieval::{self, RetrievalIndex, SearchHit};

/// Errors of the RAG flow.
#[derive(Debug)]
pub enum Error {
    /// Seeding or querying the index failed.
    Retrieval(retrieval::Error),
    /// The text generation call failed.
    Generation(ClientError),
}

impl Error {
    /// Returns the kind of the underlying error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Retrieval(err) => err.kind(),
            Error::Generation(err) => err.kind(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Retrieval(err) => write!(f, "retrieval failed: {err}"),
            Error::Generation(err) => write!(f, "generation failed: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Retrieval(err) => Some(err),
            Error::Generation(err) => {
                let err: &(dyn StdError + 'static) = &**err;
                Some(err)
            }
        }
    }
}

impl From<retrieval::Error> for Error {
    #[inline]
    fn from(err: retrieval::Error) -> Self {
        Error::Retrieval(err)
    }
}

/// A generated answer along with the passages it was grounded on.
#[derive(Clone, Debug)]
pub struct RagAnswer {
    /// The model reply.
    pub text: String,
    /// Retrieved passages, nearest first. Empty for answers generated
    /// without context.
    pub sources: Vec<SearchHit>,
}

/// Answers questions from the documents of a [`RetrievalIndex`].
pub struct RagPipeline {
    index: RetrievalIndex,
    model_client: ModelClient,
    sampling: SamplingConfig,
    top_k: usize,
}

impl RagPipeline {
    /// Creates a pipeline retrieving `top_k` passages per question.
    #[inline]
    pub fn new(
        index: RetrievalIndex,
        model_client: ModelClient,
        sampling: SamplingConfig,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            model_client,
            sampling,
            top_k,
        }
    }

    /// Returns the underlying index.
    #[inline]
    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    /// Replaces the indexed documents. See [`RetrievalIndex::seed`].
    pub async fn seed<I, S>(&mut self, texts: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.index.seed(texts).await?)
    }

    /// Retrieves the passages nearest to `question` and asks the model to
    /// answer from them.
    pub async fn answer(&self, question: &str) -> Result<RagAnswer, Error> {
        let sources = self.index.query(question, self.top_k).await?;
        let context: Vec<&str> =
            sources.iter().map(|hit| hit.document.text.as_str()).collect();
        debug!(
            "answering with {} passages: {:?}",
            context.len(),
            sources.iter().map(|h| &h.document.id).collect::<Vec<_>>()
        );

        let text = self
            .generate(prompt::with_context(question, &context))
            .await?;
        Ok(RagAnswer { text, sources })
    }

    /// Asks the model directly, without consulting the index.
    pub async fn answer_without_context(
        &self,
        question: &str,
    ) -> Result<RagAnswer, Error> {
        let text = self.generate(prompt::without_context(question)).await?;
        Ok(RagAnswer {
            text,
            sources: vec![],
        })
    }

    async fn generate(&self, prompt: String) -> Result<String, Error> {
        let req = ModelRequest::with_prompt(prompt, self.sampling);
        let resp = self
            .model_client
            .send_request(req)
            .await
            .map_err(Error::Generation)?;
        Ok(resp.text)
    }
}

#[cfg(test)]
mod tests {
    use bedrock_lab_model::ModelMessage;
    use bedrock_lab_test_model::{
        PresetResponse, TestEmbeddingProvider, TestModelProvider,
    };

    use super::*;
    use crate::model_client::EmbeddingClient;

    const DOCS: [&str; 3] = [
        "Chroma is an efficient vector store for building AI applications.",
        "Embeddings are vector representations of text in high-dimensional space.",
        "Foundation models can be fine-tuned for specific tasks and domains.",
    ];

    const SAMPLING: SamplingConfig = SamplingConfig {
        max_tokens: 1024,
        temperature: 0.0,
        top_p: 0.002,
    };

    async fn pipeline(
        embedder: &TestEmbeddingProvider,
        model: &TestModelProvider,
        top_k: usize,
    ) -> RagPipeline {
        let index = RetrievalIndex::new(EmbeddingClient::new(embedder.clone()));
        let mut pipeline =
            RagPipeline::new(index, ModelClient::new(model.clone()), SAMPLING, top_k);
        pipeline.seed(DOCS).await.unwrap();
        pipeline
    }

    fn sent_prompt(model: &TestModelProvider, i: usize) -> String {
        match &model.requests()[i].messages[..] {
            [ModelMessage::User(prompt)] => prompt.clone(),
            other => panic!("unexpected messages: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_answer_uses_retrieved_passages() {
        let embedder = TestEmbeddingProvider::default();
        let mut model = TestModelProvider::default();
        model.add_response(PresetResponse::with_text("Similarity search."));
        let pipeline = pipeline(&embedder, &model, 2).await;

        let answer = pipeline.answer(DOCS[1]).await.unwrap();
        assert_eq!(answer.text, "Similarity search.");
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].document.id, "doc_1");

        let prompt = sent_prompt(&model, 0);
        assert!(prompt.starts_with("Human: Given the following context"));
        assert!(prompt.contains(&format!("Context: {}\n", DOCS[1])));
        assert!(prompt.contains(&answer.sources[1].document.text));
        assert_eq!(model.requests()[0].sampling, SAMPLING);
    }

    #[tokio::test]
    async fn test_answer_without_context_skips_index() {
        let embedder = TestEmbeddingProvider::default();
        let mut model = TestModelProvider::default();
        model.add_response(PresetResponse::with_text("No idea."));
        let pipeline = pipeline(&embedder, &model, 2).await;
        let calls = embedder.call_count();

        let answer = pipeline
            .answer_without_context("What is Chroma?")
            .await
            .unwrap();
        assert!(answer.sources.is_empty());
        assert_eq!(embedder.call_count(), calls);
        assert_eq!(sent_prompt(&model, 0), "Human: What is Chroma?\n\nAssistant:");
    }

    #[tokio::test]
    async fn test_empty_index_falls_back_to_plain_prompt() {
        let embedder = TestEmbeddingProvider::default();
        let mut model = TestModelProvider::default();
        model.add_response(PresetResponse::with_text("Hmm."));
        let pipeline = RagPipeline::new(
            RetrievalIndex::new(EmbeddingClient::new(embedder)),
            ModelClient::new(model.clone()),
            SAMPLING,
            2,
        );

        let answer = pipeline.answer("What is RAG?").await.unwrap();
        assert!(answer.sources.is_empty());
        assert_eq!(sent_prompt(&model, 0), "Human: What is RAG?\n\nAssistant:");
    }

    #[tokio::test]
    async fn test_retrieval_failure_sends_nothing() {
        let embedder = TestEmbeddingProvider::default();
        let model = TestModelProvider::default();
        let pipeline = pipeline(&embedder, &model, 2).await;

        embedder.fail_on("broken question");
        let err = pipeline.answer("broken question").await.unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
        assert_eq!(model.request_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let embedder = TestEmbeddingProvider::default();
        let mut model = TestModelProvider::default();
        model.add_response(PresetResponse::always_failing());
        let pipeline = pipeline(&embedder, &model, 2).await;

        let err = pipeline.answer("What is Chroma?").await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
