use std::collections::HashSet;
use std::future::ready;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bedrock_lab_model::{Embedding, EmbeddingProvider, ErrorKind};

use crate::Error;

const DEFAULT_DIMENSION: usize = 64;

/// A deterministic embedding model for testing purpose.
///
/// Texts are embedded as a normalized bag of hashed words, so equal texts
/// always get equal vectors and texts sharing words are close to each
/// other. Calls are counted, and specific texts can be made to fail.
#[derive(Clone, Debug)]
pub struct TestEmbeddingProvider {
    dimension: usize,
    calls: Arc<AtomicUsize>,
    failing_texts: Arc<Mutex<HashSet<String>>>,
}

impl Default for TestEmbeddingProvider {
    fn default() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }
}

impl TestEmbeddingProvider {
    #[inline]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            calls: Default::default(),
            failing_texts: Default::default(),
        }
    }

    /// Makes every later call embedding exactly `text` fail.
    pub fn fail_on<S: Into<String>>(&self, text: S) {
        self.failing_texts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(text.into());
    }

    /// Returns how many times [`EmbeddingProvider::embed`] was called,
    /// failed calls included.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Computes the embedding without counting the call.
    pub fn embed_now(&self, text: &str) -> Embedding {
        let mut values = vec![0.0f32; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = fnv1a(&word.to_lowercase()) % self.dimension as u64;
            values[bucket as usize] += 1.0;
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            values.iter_mut().for_each(|v| *v /= norm);
        }
        Embedding::new(values)
    }
}

impl EmbeddingProvider for TestEmbeddingProvider {
    type Error = crate::Error;

    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Embedding, Self::Error>> + Send + 'static
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_texts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(text);
        let result = if should_fail {
            Err(Error {
                message: "preset embedding failure",
                kind: ErrorKind::Other,
            })
        } else {
            Ok(self.embed_now(text))
        };
        ready(result)
    }
}

fn fnv1a(word: &str) -> u64 {
    word.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
