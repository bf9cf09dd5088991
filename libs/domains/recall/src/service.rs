use std::sync::Arc;

use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RecallError, RecallResult};
use crate::index::VectorIndex;
use crate::models::SearchHit;

/// Recall service: embedding generation composed with the vector index.
///
/// Construct one instance at process start (or one per test case) and pass
/// it to every consumer; the index it owns is the shared state.
pub struct RecallService {
    index: VectorIndex,
    provider: Arc<dyn EmbeddingProvider>,
}

impl RecallService {
    /// Create a service with an empty index sized to the provider's
    /// embedding dimension.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let index = VectorIndex::new(provider.dimension());
        Self { index, provider }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Embed `content` and append it to the index under `identifier`.
    ///
    /// The embedding happens first; if it fails, nothing is inserted.
    pub async fn add_document(&self, identifier: &str, content: &str) -> RecallResult<()> {
        let vector = self.provider.embed(content).await?;
        self.index.insert(identifier, vector)?;

        debug!(identifier, total = self.index.len(), "Indexed document");
        Ok(())
    }

    /// Embed `query` and return its `top_k` nearest documents.
    ///
    /// `top_k` is validated before the embedding call so a bad argument
    /// never costs a provider round trip.
    pub async fn search(&self, query: &str, top_k: usize) -> RecallResult<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(RecallError::InvalidArgument(
                "top_k must be positive".to_string(),
            ));
        }

        let vector = self.provider.embed(query).await?;
        let hits = self.index.nearest(&vector, top_k)?;

        debug!(query, hits = hits.len(), "Searched index");
        Ok(hits)
    }
}
