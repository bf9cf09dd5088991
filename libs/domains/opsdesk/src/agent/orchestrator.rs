use std::collections::BTreeMap;
use std::sync::Arc;

use domain_recall::{RecallService, SearchHit};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use super::completion::CompletionClient;
use super::gate::{UnsafeKeywordPolicy, VerdictPolicy};
use super::prompts;
use crate::error::{OpsError, OpsResult};
use crate::models::{
    PipelineStage, ProcessOutcome, ProcessRequest, RequestCategory, Row, SchemaDescriptor,
};
use crate::repository::OpsRepository;

/// Drives one operations request through the pipeline.
///
/// Stages run strictly in order (classify, synthesize, validate, execute,
/// format, retrieve), each a single synchronous call into its collaborator,
/// never retried, with no re-entry. The only branch is the validation gate:
/// a rejected verdict short-circuits to [`ProcessOutcome::Rejected`] before
/// anything reaches the data store.
///
/// All collaborators are injected; construct one orchestrator per process
/// (or per test case) and share it behind an `Arc`.
pub struct OpsOrchestrator<R: OpsRepository> {
    repository: Arc<R>,
    completion: Arc<dyn CompletionClient>,
    recall: Arc<RecallService>,
    schema: SchemaDescriptor,
    gate: Arc<dyn VerdictPolicy>,
}

impl<R: OpsRepository + 'static> OpsOrchestrator<R> {
    /// Create an orchestrator with the default validation gate
    pub fn new(
        repository: R,
        completion: Arc<dyn CompletionClient>,
        recall: Arc<RecallService>,
        schema: SchemaDescriptor,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            completion,
            recall,
            schema,
            gate: Arc::new(UnsafeKeywordPolicy),
        }
    }

    /// Replace the validation gate policy
    pub fn with_gate(mut self, gate: Arc<dyn VerdictPolicy>) -> Self {
        self.gate = gate;
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// Returns the terminal outcome (completed or gate-rejected) or the
    /// first collaborator fault, tagged with the stage that raised it.
    pub async fn process(&self, request: &ProcessRequest) -> OpsResult<ProcessOutcome> {
        let classification = self.classify(&request.description).await?;
        info!(%classification, "Classified request");

        let query = self.synthesize(classification, &request.parameters).await?;
        info!(query = %query, "Synthesized query");

        let verdict = self.validate(&query).await?;
        if self.gate.rejects(&verdict) {
            warn!(feedback = %verdict, "Validation gate rejected query");
            return Ok(ProcessOutcome::Rejected {
                classification,
                query,
                feedback: verdict,
            });
        }

        let rows = self.execute(&query).await?;
        info!(rows = rows.len(), "Executed query");

        let summary = self.format(&rows, classification).await?;

        let retrieval = self
            .retrieve(&request.description, request.retrieval_limit)
            .await?;
        info!(hits = retrieval.len(), "Merged recall results");

        Ok(ProcessOutcome::Completed {
            classification,
            query,
            summary,
            retrieval,
        })
    }

    /// Map the free-text request onto the closed category set
    async fn classify(&self, description: &str) -> OpsResult<RequestCategory> {
        let raw = self
            .completion
            .complete(
                &prompts::classification_prompt(description),
                prompts::CLASSIFY_MAX_TOKENS,
            )
            .await
            .map_err(|e| OpsError::completion(PipelineStage::Classifying, e))?;

        let label = raw.trim();
        label
            .parse()
            .map_err(|_| OpsError::UnrecognizedCategory(label.to_string()))
    }

    /// Produce the candidate query. The trimmed completion is taken
    /// verbatim; safety checking belongs to the validation stage.
    async fn synthesize(
        &self,
        category: RequestCategory,
        parameters: &BTreeMap<String, JsonValue>,
    ) -> OpsResult<String> {
        let raw = self
            .completion
            .complete(
                &prompts::query_prompt(category, parameters, &self.schema),
                prompts::SYNTHESIZE_MAX_TOKENS,
            )
            .await
            .map_err(|e| OpsError::completion(PipelineStage::Synthesizing, e))?;

        Ok(raw.trim().to_string())
    }

    /// Obtain the free-text verdict for the gate
    async fn validate(&self, query: &str) -> OpsResult<String> {
        let raw = self
            .completion
            .complete(&prompts::validation_prompt(query), prompts::VALIDATE_MAX_TOKENS)
            .await
            .map_err(|e| OpsError::completion(PipelineStage::Validating, e))?;

        Ok(raw.trim().to_string())
    }

    async fn execute(&self, query: &str) -> OpsResult<Vec<Row>> {
        self.repository.run_query(query).await
    }

    /// Summarize the rows for the requester
    async fn format(&self, rows: &[Row], category: RequestCategory) -> OpsResult<String> {
        let raw = self
            .completion
            .complete(
                &prompts::summary_prompt(rows, category),
                prompts::FORMAT_MAX_TOKENS,
            )
            .await
            .map_err(|e| OpsError::completion(PipelineStage::Formatting, e))?;

        Ok(raw.trim().to_string())
    }

    /// Look up semantically similar prior documents for the original
    /// request text. Runs after formatting and never flips a completed
    /// pipeline to rejected; a failure here surfaces like any other stage
    /// fault.
    async fn retrieve(&self, description: &str, limit: usize) -> OpsResult<Vec<SearchHit>> {
        let hits = self.recall.search(description, limit).await?;
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::completion::MockCompletionClient;
    use crate::agent::gate::StrictVerdictPolicy;
    use crate::error::CompletionError;
    use crate::repository::MockOpsRepository;
    use async_trait::async_trait;
    use domain_recall::{EmbeddingProvider, RecallError, RecallResult};
    use serde_json::json;

    /// Embeddings stub: "trade"-flavored texts land near each other,
    /// reports elsewhere
    struct StubEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for StubEmbeddings {
        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
            Ok(match text {
                "trade delayed" => vec![1.0, 0.0],
                "report generated" => vec![0.0, 1.0],
                _ => vec![0.9, 0.1],
            })
        }
    }

    /// Embeddings stub that always fails
    struct FailingEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbeddings {
        fn dimension(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> RecallResult<Vec<f32>> {
            Err(RecallError::Embedding("provider unavailable".to_string()))
        }
    }

    /// Completion stub scripted per stage prompt, with a configurable
    /// verdict
    fn scripted_completion(verdict: &'static str) -> MockCompletionClient {
        let mut client = MockCompletionClient::new();
        client.expect_complete().returning(move |prompt, _| {
            if prompt.starts_with("Classify") {
                Ok("Trade Failure".to_string())
            } else if prompt.contains("generating an SQL query") {
                Ok("SELECT * FROM trades WHERE status = 'failed'".to_string())
            } else if prompt.starts_with("Validate") {
                Ok(verdict.to_string())
            } else if prompt.starts_with("Format") {
                Ok("2 failed trades found in the last month.".to_string())
            } else {
                Err(CompletionError(format!("unexpected prompt: {prompt}")))
            }
        });
        client
    }

    fn failed_trade_rows() -> Vec<Row> {
        vec![
            json!({"trade_id": 1, "status": "failed"}),
            json!({"trade_id": 2, "status": "failed"}),
        ]
    }

    async fn recall_with_documents() -> Arc<RecallService> {
        let recall = Arc::new(RecallService::new(Arc::new(StubEmbeddings)));
        recall.add_document("doc1", "trade delayed").await.unwrap();
        recall
            .add_document("doc2", "report generated")
            .await
            .unwrap();
        recall
    }

    fn request(description: &str, retrieval_limit: usize) -> ProcessRequest {
        let mut parameters = BTreeMap::new();
        parameters.insert("date_range".to_string(), json!("last month"));
        ProcessRequest {
            description: description.to_string(),
            parameters,
            retrieval_limit,
        }
    }

    #[tokio::test]
    async fn test_happy_path_completes_with_summary_and_retrieval() {
        let mut repository = MockOpsRepository::new();
        repository
            .expect_run_query()
            .withf(|query| query.contains("trades"))
            .times(1)
            .returning(|_| Ok(failed_trade_rows()));

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("The query is safe and efficient.")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request(
                "Retrieve all failed trades from the last month",
                1,
            ))
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Completed {
                classification,
                query,
                summary,
                retrieval,
            } => {
                assert_eq!(classification, RequestCategory::TradeFailure);
                assert!(query.contains("trades"));
                assert!(!summary.is_empty());
                // the request text embeds nearest to the trade document
                assert_eq!(retrieval.len(), 1);
                assert_eq!(retrieval[0].identifier, "doc1");
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsafe_verdict_rejects_before_execution() {
        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("Unsafe query detected")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request(
                "Retrieve all failed trades from the last month",
                5,
            ))
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Rejected {
                classification,
                feedback,
                ..
            } => {
                assert_eq!(classification, RequestCategory::TradeFailure);
                assert!(feedback.contains("Unsafe"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verdict_mentioning_unsafe_anywhere_rejects() {
        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion(
                "Efficient, but Unsafe without a WHERE clause.",
            )),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_lowercase_unsafe_passes_the_default_gate() {
        let mut repository = MockOpsRepository::new();
        repository
            .expect_run_query()
            .times(1)
            .returning(|_| Ok(vec![]));

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("possibly unsafe, hard to tell")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn test_strict_gate_rejects_lowercase_unsafe() {
        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("possibly unsafe, hard to tell")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        )
        .with_gate(Arc::new(StrictVerdictPolicy));

        let outcome = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap();

        assert!(matches!(outcome, ProcessOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_out_of_set_classification_fails_explicitly() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Ok("General Inquiry".to_string()));

        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(client),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let err = orchestrator
            .process(&request("What is the meaning of life?", 5))
            .await
            .unwrap_err();

        match err {
            OpsError::UnrecognizedCategory(label) => assert_eq!(label, "General Inquiry"),
            other => panic!("expected UnrecognizedCategory, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_classifier_output_is_trimmed_before_parsing() {
        let mut client = MockCompletionClient::new();
        client.expect_complete().returning(|prompt, _| {
            if prompt.starts_with("Classify") {
                Ok("  Report Generation \n".to_string())
            } else if prompt.contains("generating an SQL query") {
                Ok("SELECT * FROM trades".to_string())
            } else if prompt.starts_with("Validate") {
                Ok("Unsafe".to_string())
            } else {
                Err(CompletionError("unexpected prompt".to_string()))
            }
        });

        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(client),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request("Generate the monthly report", 5))
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Rejected { classification, .. } => {
                assert_eq!(classification, RequestCategory::ReportGeneration);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_completion_failure_carries_the_failing_stage() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Err(CompletionError("service unavailable".to_string())));

        let mut repository = MockOpsRepository::new();
        repository.expect_run_query().times(0);

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(client),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let err = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap_err();

        match err {
            OpsError::Completion { stage, .. } => assert_eq!(stage, PipelineStage::Classifying),
            other => panic!("expected Completion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execution_failure_aborts_before_formatting() {
        let mut repository = MockOpsRepository::new();
        repository
            .expect_run_query()
            .times(1)
            .returning(|_| Err(OpsError::Execution("connection refused".to_string())));

        // the scripted stub errors on a Format prompt, so reaching the
        // formatting stage would surface as a Completion fault instead
        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("All good.")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let err = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap_err();

        assert!(matches!(err, OpsError::Execution(_)));
    }

    #[tokio::test]
    async fn test_retrieval_failure_surfaces_as_stage_fault() {
        let mut repository = MockOpsRepository::new();
        repository
            .expect_run_query()
            .times(1)
            .returning(|_| Ok(failed_trade_rows()));

        let recall = Arc::new(RecallService::new(Arc::new(FailingEmbeddings)));

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("The query is safe.")),
            recall,
            SchemaDescriptor::trading_ops(),
        );

        let err = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap_err();

        assert!(matches!(err, OpsError::Recall(_)));
    }

    #[tokio::test]
    async fn test_empty_rows_still_complete() {
        let mut repository = MockOpsRepository::new();
        repository
            .expect_run_query()
            .times(1)
            .returning(|_| Ok(vec![]));

        let orchestrator = OpsOrchestrator::new(
            repository,
            Arc::new(scripted_completion("The query is safe.")),
            recall_with_documents().await,
            SchemaDescriptor::trading_ops(),
        );

        let outcome = orchestrator
            .process(&request("Retrieve all failed trades", 5))
            .await
            .unwrap();

        match outcome {
            ProcessOutcome::Completed { retrieval, .. } => {
                // both indexed documents fit inside the limit
                assert_eq!(retrieval.len(), 2);
            }
            other => panic!("expected Completed, got {other:?}"),
        }
    }
}
