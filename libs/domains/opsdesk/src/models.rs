use std::collections::BTreeMap;

use domain_recall::SearchHit;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Category of an operations request.
///
/// The classifier stage parses the model's raw text into this closed set;
/// anything else is rejected with `OpsError::UnrecognizedCategory` instead
/// of flowing downstream unchecked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum RequestCategory {
    #[serde(rename = "Data Issue")]
    #[strum(serialize = "Data Issue")]
    DataIssue,
    #[serde(rename = "Trade Failure")]
    #[strum(serialize = "Trade Failure")]
    TradeFailure,
    #[serde(rename = "Report Generation")]
    #[strum(serialize = "Report Generation")]
    ReportGeneration,
}

/// Pipeline stages in execution order. Carried in errors so the caller can
/// tell which stage aborted the request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PipelineStage {
    Classifying,
    Synthesizing,
    Validating,
    Executing,
    Formatting,
    Retrieving,
}

/// Read-only description of the queryable schema: table name mapped to its
/// ordered column list. Supplied by the caller of the orchestrator; the
/// pipeline never owns or mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SchemaDescriptor {
    tables: BTreeMap<String, Vec<String>>,
}

impl SchemaDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.tables
            .insert(name.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Render the schema for prompt embedding, one `table(col, col, ...)`
    /// line per table.
    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(|(table, columns)| format!("{}({})", table, columns.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The trading-operations schema bundled with the service
    pub fn trading_ops() -> Self {
        Self::new()
            .with_table(
                "trades",
                ["trade_id", "status", "trade_date", "amount", "user_id"],
            )
            .with_table("users", ["user_id", "name", "email", "department"])
    }
}

/// A result row from the execution stage: a JSON object mapping column
/// names to values.
pub type Row = JsonValue;

/// An operations request entering the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProcessRequest {
    /// Free-text intent, e.g. "Retrieve all failed trades from the last month"
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    /// Named parameters for query synthesis, e.g. {"date_range": "last month"}
    #[serde(default)]
    pub parameters: BTreeMap<String, JsonValue>,
    /// Maximum number of recall hits to merge into the response
    #[serde(default = "default_retrieval_limit")]
    pub retrieval_limit: usize,
}

fn default_retrieval_limit() -> usize {
    5
}

/// Terminal outcome of a pipeline run.
///
/// A gate rejection is an expected termination, distinguished here from
/// collaborator faults (which surface as `Err(OpsError)`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessOutcome {
    /// The pipeline ran to completion
    Completed {
        classification: RequestCategory,
        query: String,
        summary: String,
        retrieval: Vec<SearchHit>,
    },
    /// The validation gate rejected the synthesized query; execution,
    /// formatting and retrieval never ran
    Rejected {
        classification: RequestCategory,
        query: String,
        feedback: String,
    },
}
