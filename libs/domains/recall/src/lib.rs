//! Recall Domain
//!
//! Semantic document recall: an in-memory vector similarity index fed by a
//! text-embedding provider. The pipeline uses it to attach previously seen
//! documents (incident notes, past requests) to a response based on meaning
//! rather than keywords.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  RecallService  │  ← embed-then-index, embed-then-search
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌──────────────────┐
//! │   VectorIndex   │     │ EmbeddingProvider │
//! │ (exact L2 scan) │     │     (trait)       │
//! └─────────────────┘     └────────┬─────────┘
//!                                  │
//!                         ┌────────▼─────────┐
//!                         │ OpenAiEmbeddings │
//!                         └──────────────────┘
//! ```
//!
//! The index is deliberately exact: every stored vector is scanned per
//! search and ranked by Euclidean distance, ties broken by insertion order.
//! Entries live for the life of the process; there is no persistence, so a
//! restart starts from an empty index.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_recall::{OpenAiEmbeddings, RecallService};
//! use core_config::llm::LlmConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LlmConfig::new("sk-...".to_string());
//! let service = RecallService::new(Arc::new(OpenAiEmbeddings::new(config)));
//!
//! service.add_document("doc1", "trade settlement delayed").await?;
//! let hits = service.search("delayed trades", 5).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use embedding::{EmbeddingProvider, OpenAiEmbeddings};
pub use error::{RecallError, RecallResult};
pub use handlers::RecallState;
pub use index::VectorIndex;
pub use models::{AddDocument, SearchDocuments, SearchHit};
pub use service::RecallService;
