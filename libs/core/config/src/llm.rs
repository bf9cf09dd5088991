use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// Configuration for the OpenAI-compatible completion and embedding services.
///
/// Both the chat-completion client and the embedding provider read from the
/// same endpoint and key; the models differ per concern.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    /// Chat model used by the pipeline stages
    pub completion_model: String,
    /// Embedding model backing the vector index
    pub embedding_model: String,
    /// Vector dimension produced by `embedding_model`; fixed for the life
    /// of the index
    pub embedding_dimension: usize,
}

impl LlmConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            completion_model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimension: 1536,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl FromEnv for LlmConfig {
    /// Environment variables:
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_BASE_URL` (default: https://api.openai.com/v1)
    /// - `LLM_COMPLETION_MODEL` (default: gpt-4o)
    /// - `LLM_EMBEDDING_MODEL` (default: text-embedding-3-small)
    /// - `LLM_EMBEDDING_DIMENSION` (default: 1536)
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("OPENAI_API_KEY")?;
        let base_url = env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
        let completion_model = env_or_default("LLM_COMPLETION_MODEL", "gpt-4o");
        let embedding_model = env_or_default("LLM_EMBEDDING_MODEL", "text-embedding-3-small");
        let embedding_dimension = env_or_default("LLM_EMBEDDING_DIMENSION", "1536")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "LLM_EMBEDDING_DIMENSION".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            api_key,
            base_url,
            completion_model,
            embedding_model,
            embedding_dimension,
        })
    }
}
