use async_trait::async_trait;
use core_config::llm::LlmConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::error::{RecallError, RecallResult};

/// Upper bound on input length, a conservative character proxy for the
/// provider-side 8192-token limit
const MAX_INPUT_CHARS: usize = 32_000;

/// OpenAI embeddings provider
pub struct OpenAiEmbeddings {
    client: Client,
    config: LlmConfig,
}

impl OpenAiEmbeddings {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    async fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        if text.is_empty() {
            return Err(RecallError::Embedding(
                "cannot embed empty input".to_string(),
            ));
        }
        if text.len() > MAX_INPUT_CHARS {
            return Err(RecallError::Embedding(format!(
                "input of {} characters exceeds the {} character limit",
                text.len(),
                MAX_INPUT_CHARS
            )));
        }

        let request = EmbeddingRequest {
            model: self.config.embedding_model.clone(),
            input: vec![text.to_string()],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecallError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response.json().await?;

        let vector = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RecallError::Embedding("No embedding returned".to_string()))?;

        if vector.len() != self.config.embedding_dimension {
            return Err(RecallError::Embedding(format!(
                "model returned {} components, expected {}",
                vector.len(),
                self.config.embedding_dimension
            )));
        }

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiEmbeddings {
        OpenAiEmbeddings::new(LlmConfig::new("sk-test".to_string()))
    }

    #[test]
    fn test_dimension_comes_from_config() {
        assert_eq!(provider().dimension(), 1536);
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_input_without_network() {
        let err = provider().embed("").await.unwrap_err();
        assert!(matches!(err, RecallError::Embedding(_)));
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_embed_rejects_oversized_input_without_network() {
        let text = "x".repeat(MAX_INPUT_CHARS + 1);
        let err = provider().embed(&text).await.unwrap_err();
        assert!(matches!(err, RecallError::Embedding(_)));
        assert!(err.to_string().contains("character limit"));
    }
}
