//! Opsdesk Domain
//!
//! Answers natural-language operations questions ("retrieve failed trades
//! from last month") through a fixed pipeline: classify the request,
//! synthesize a schema-bound SQL query, gate it through a safety
//! validation, execute it, format the rows into a summary, and merge in
//! semantically similar prior documents from the recall index.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ OpsOrchestrator │  ← stage sequencing, validation gate, retrieval merge
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌──────────────────┐
//! │  OpsRepository  │     │ CompletionClient │
//! │    (trait)      │     │     (trait)      │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//! ┌────────▼────────┐     ┌────────▼─────────┐
//! │ PgOpsRepository │     │ OpenAiChatClient │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! The pipeline is a strictly ordered state machine:
//! `Classifying → Synthesizing → Validating → Executing → Formatting →
//! Retrieving → Done`, with a single abort edge out of `Validating` when
//! the gate rejects. A gate rejection is an expected outcome
//! ([`ProcessOutcome::Rejected`]), not a fault; collaborator failures abort
//! the request with an [`OpsError`] naming the failing stage.

pub mod agent;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;

// Re-export commonly used types
pub use agent::{
    CompletionClient, OpenAiChatClient, OpsOrchestrator, StrictVerdictPolicy,
    UnsafeKeywordPolicy, VerdictPolicy,
};
pub use error::{CompletionError, OpsError, OpsResult};
pub use models::{
    PipelineStage, ProcessOutcome, ProcessRequest, RequestCategory, Row, SchemaDescriptor,
};
pub use postgres::PgOpsRepository;
pub use repository::OpsRepository;

// Re-export handler types
pub use handlers::OpsState;
