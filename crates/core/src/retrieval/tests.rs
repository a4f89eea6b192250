use std::collections::HashSet;

use bedrock_lab_test_model::TestEmbeddingProvider;

use super::*;

const DOCS: [&str; 5] = [
    "Amazon Bedrock is a fully managed foundation model service.",
    "RAG systems combine retrieval and generation for improved responses.",
    "Embeddings are vector representations of text in high-dimensional space.",
    "Chroma is an efficient vector store for building AI applications.",
    "Foundation models can be fine-tuned for specific tasks and domains.",
];

async fn seeded(provider: &TestEmbeddingProvider, metric: Metric) -> RetrievalIndex {
    let mut index =
        RetrievalIndex::with_metric(EmbeddingClient::new(provider.clone()), metric);
    index.seed(DOCS).await.unwrap();
    index
}

#[tokio::test]
async fn test_seed_assigns_positional_ids() {
    let provider = TestEmbeddingProvider::default();
    let index = seeded(&provider, Metric::Cosine).await;

    assert_eq!(index.len(), DOCS.len());
    assert_eq!(provider.call_count(), DOCS.len());
    for (i, doc) in index.documents().enumerate() {
        assert_eq!(doc.id, format!("doc_{i}"));
        assert_eq!(doc.text, DOCS[i]);
    }
}

#[tokio::test]
async fn test_exact_text_ranks_first() {
    for metric in [Metric::Cosine, Metric::DotProduct, Metric::Euclidean] {
        let provider = TestEmbeddingProvider::default();
        let index = seeded(&provider, metric).await;

        for (i, text) in DOCS.iter().enumerate() {
            let hits = index.query(text, 1).await.unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].document.id, format!("doc_{i}"), "{metric:?}");
        }
    }
}

#[tokio::test]
async fn test_query_returns_min_of_top_k_and_len() {
    let provider = TestEmbeddingProvider::default();
    let index = seeded(&provider, Metric::Cosine).await;

    for top_k in [0, 1, 2, 5, 8] {
        let hits = index.query("What is a vector store?", top_k).await.unwrap();
        assert_eq!(hits.len(), top_k.min(DOCS.len()));

        let ids: HashSet<_> = hits.iter().map(|h| h.document.id.clone()).collect();
        assert_eq!(ids.len(), hits.len());
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[tokio::test]
async fn test_every_query_embeds_once() {
    let provider = TestEmbeddingProvider::default();
    let index = seeded(&provider, Metric::Cosine).await;
    let after_seed = provider.call_count();

    index.query("embeddings", 2).await.unwrap();
    index.query("embeddings", 2).await.unwrap();
    assert_eq!(provider.call_count(), after_seed + 2);
}

#[tokio::test]
async fn test_query_on_empty_index() {
    let provider = TestEmbeddingProvider::default();
    let index = RetrievalIndex::new(EmbeddingClient::new(provider.clone()));
    assert!(index.is_empty());
    assert!(index.query("anything", 3).await.unwrap().is_empty());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_reseed_replaces_content() {
    let provider = TestEmbeddingProvider::default();
    let mut index = seeded(&provider, Metric::Cosine).await;

    let count = index.seed(["Only one document now."]).await.unwrap();
    assert_eq!(count, 1);
    let ids: Vec<_> = index.documents().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["doc_0"]);

    index.clear();
    assert!(index.is_empty());
}

#[tokio::test]
async fn test_failed_seed_keeps_previous_content() {
    let provider = TestEmbeddingProvider::default();
    let mut index = seeded(&provider, Metric::Cosine).await;

    provider.fail_on("broken");
    let err = index.seed(["fine", "broken", "never embedded"]).await.unwrap_err();
    assert!(matches!(err, Error::Embedding(_)));
    assert_eq!(err.kind(), ErrorKind::Other);
    assert_eq!(index.len(), DOCS.len());
}

#[tokio::test]
async fn test_failed_query_embedding_propagates() {
    let provider = TestEmbeddingProvider::default();
    let index = seeded(&provider, Metric::Cosine).await;

    provider.fail_on("unlucky question");
    let err = index.query("unlucky question", 2).await.unwrap_err();
    assert!(err.to_string().starts_with("embedding failed"));
}

#[tokio::test]
async fn test_dimension_mismatch() {
    let seeding = TestEmbeddingProvider::with_dimension(16);
    let mut index = RetrievalIndex::new(EmbeddingClient::new(seeding));
    index.seed(DOCS).await.unwrap();

    // Swap in a model with another dimension, as if the config changed.
    index.embedder = EmbeddingClient::new(TestEmbeddingProvider::with_dimension(32));
    let err = index.query("vectors", 1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 16,
            actual: 32
        }
    ));
}

#[test]
fn test_undefined_score_is_dropped() {
    let huge = Embedding::new(vec![f32::MAX; 4]);
    let unit = Embedding::new(vec![0.5; 4]);

    // The squared norm overflows, so cosine is inf / inf.
    assert!(huge.cosine_similarity(&huge).unwrap().is_nan());
    assert_eq!(Metric::Cosine.score(&huge, &huge), None);
    assert_eq!(Metric::Cosine.score(&unit, &unit), Some(1.0));
    assert_eq!(Metric::DotProduct.score(&huge, &unit), Some(f32::INFINITY));
}

#[tokio::test]
async fn test_undefined_scores_rank_last() {
    let provider = TestEmbeddingProvider::default();
    let mut index = RetrievalIndex::new(EmbeddingClient::new(provider.clone()));
    index.seed(["alpha", "beta", "gamma"]).await.unwrap();

    // inf * 0 makes every metric undefined against this vector.
    index.records[1].embedding = Embedding::new(vec![f32::INFINITY; 64]);

    let hits = index.query("gamma", 3).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].score, 1.0);
    assert_eq!(hits[2].document.id, "doc_1");
    assert_eq!(hits[2].score, f32::NEG_INFINITY);
}
