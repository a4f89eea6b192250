//! An in-memory vector index answering nearest-neighbor queries.
//!
//! Documents are embedded once when the index is seeded, queries are
//! embedded on every call with the same [`EmbeddingClient`], and ranked
//! by brute force against every stored document.

#[cfg(test)]
mod tests;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use bedrock_lab_model::{Embedding, ErrorKind};
use serde::{Deserialize, Serialize};

use crate::model_client::{ClientError, EmbeddingClient};

/// A stored text with its positional id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Document {
    /// `doc_{i}`, where `i` is the position in the seeding call.
    pub id: String,
    /// The original text.
    pub text: String,
}

/// One query result.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    /// The matched document.
    pub document: Document,
    /// Similarity to the query, higher is nearer.
    pub score: f32,
}

/// How embeddings are compared.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Cosine similarity.
    #[default]
    Cosine,
    /// Inner product, equivalent to cosine for normalized embeddings.
    DotProduct,
    /// Negated euclidean distance.
    Euclidean,
}

impl Metric {
    /// Scores `candidate` against `query`. Mismatched dimensions and
    /// undefined results (overflowing values) give `None`.
    fn score(self, query: &Embedding, candidate: &Embedding) -> Option<f32> {
        let score = match self {
            Metric::Cosine => query.cosine_similarity(candidate),
            Metric::DotProduct => query.dot(candidate),
            Metric::Euclidean => query.euclidean_distance(candidate).map(|d| -d),
        };
        score.filter(|s| !s.is_nan())
    }
}

/// Errors of the retrieval index.
#[derive(Debug)]
pub enum Error {
    /// The embedding call failed.
    Embedding(ClientError),
    /// The embedding model returned vectors of different lengths.
    DimensionMismatch {
        /// Dimension of the stored embeddings.
        expected: usize,
        /// Dimension of the offending embedding.
        actual: usize,
    },
}

impl Error {
    /// Returns the provider error kind, [`ErrorKind::Other`] for errors
    /// raised by the index itself.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Embedding(err) => err.kind(),
            Error::DimensionMismatch { .. } => ErrorKind::Other,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Embedding(err) => write!(f, "embedding failed: {err}"),
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "embedding dimension mismatch: expected {expected}, got {actual}"
            ),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Embedding(err) => {
                let err: &(dyn StdError + 'static) = &**err;
                Some(err)
            }
            Error::DimensionMismatch { .. } => None,
        }
    }
}

impl From<ClientError> for Error {
    #[inline]
    fn from(err: ClientError) -> Self {
        Error::Embedding(err)
    }
}

struct Record {
    document: Document,
    embedding: Embedding,
}

/// A collection of embedded documents.
pub struct RetrievalIndex {
    embedder: EmbeddingClient,
    metric: Metric,
    records: Vec<Record>,
}

impl RetrievalIndex {
    /// Creates an empty index using the cosine metric.
    #[inline]
    pub fn new(embedder: EmbeddingClient) -> Self {
        Self::with_metric(embedder, Metric::default())
    }

    /// Creates an empty index with the given metric.
    #[inline]
    pub fn with_metric(embedder: EmbeddingClient, metric: Metric) -> Self {
        Self {
            embedder,
            metric,
            records: vec![],
        }
    }

    /// Returns the number of stored documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the stored documents in id order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.records.iter().map(|r| &r.document)
    }

    /// Removes every document.
    #[inline]
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Replaces the content of the index with `texts`, embedding each of
    /// them, one call per text. Returns the number of stored documents.
    ///
    /// The previous content is kept if any embedding fails.
    pub async fn seed<I, S>(&mut self, texts: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records: Vec<Record> = vec![];
        for (i, text) in texts.into_iter().enumerate() {
            let text = text.into();
            let embedding = self.embedder.embed(&text).await?;
            if let Some(first) = records.first() {
                let expected = first.embedding.dimension();
                if embedding.dimension() != expected {
                    return Err(Error::DimensionMismatch {
                        expected,
                        actual: embedding.dimension(),
                    });
                }
            }
            trace!("embedded doc_{i} ({} dimensions)", embedding.dimension());
            records.push(Record {
                document: Document {
                    id: format!("doc_{i}"),
                    text,
                },
                embedding,
            });
        }

        if !self.records.is_empty() {
            debug!("replacing {} seeded documents", self.records.len());
        }
        self.records = records;
        info!("seeded {} documents", self.records.len());
        Ok(self.records.len())
    }

    /// Returns the `top_k` documents nearest to `text`, nearest first.
    ///
    /// The query text is embedded on every call. Fewer than `top_k` hits
    /// are returned when the index holds fewer documents.
    pub async fn query(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, Error> {
        let query = self.embedder.embed(text).await?;
        if let Some(first) = self.records.first() {
            let expected = first.embedding.dimension();
            if query.dimension() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: query.dimension(),
                });
            }
        }

        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .map(|record| SearchHit {
                document: record.document.clone(),
                score: self
                    .metric
                    .score(&query, &record.embedding)
                    .unwrap_or(f32::NEG_INFINITY),
            })
            .collect();
        // Stable, so equal scores keep insertion order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);

        debug!("query matched {} of {} documents", hits.len(), self.len());
        Ok(hits)
    }
}
