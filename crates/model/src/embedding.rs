use serde::{Deserialize, Serialize};

/// A fixed-length vector representation of a text.
///
/// The values are opaque to the callers, an embedding is only meaningful
/// when compared against other embeddings from the same model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Creates an embedding from raw values.
    #[inline]
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Returns the raw values.
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.0
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Returns the euclidean norm.
    pub fn magnitude(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Returns the dot product, or `None` if the dimensions differ.
    pub fn dot(&self, other: &Embedding) -> Option<f32> {
        if self.dimension() != other.dimension() {
            return None;
        }
        Some(self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum())
    }

    /// Returns the cosine similarity in `-1.0..=1.0`, or `None` if the
    /// dimensions differ. Zero vectors are similar to nothing.
    pub fn cosine_similarity(&self, other: &Embedding) -> Option<f32> {
        let dot = self.dot(other)?;
        let norms = self.magnitude() * other.magnitude();
        if norms == 0.0 {
            return Some(0.0);
        }
        Some(dot / norms)
    }

    /// Returns the euclidean distance, or `None` if the dimensions differ.
    pub fn euclidean_distance(&self, other: &Embedding) -> Option<f32> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let sum = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>();
        Some(sum.sqrt())
    }
}

impl From<Vec<f32>> for Embedding {
    #[inline]
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}
