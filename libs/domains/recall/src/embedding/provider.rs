use async_trait::async_trait;

use crate::error::RecallResult;

/// Capability trait for embedding generation.
///
/// Given a text, an implementation returns a fixed-length numeric vector or
/// fails. The dimension is fixed per provider instance; every vector it
/// returns has exactly `dimension()` components. Implementations reject
/// empty and over-length input.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Vector length this provider produces
    fn dimension(&self) -> usize;

    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> RecallResult<Vec<f32>>;
}
