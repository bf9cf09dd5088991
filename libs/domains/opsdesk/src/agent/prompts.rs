//! Prompts and output budgets for the pipeline stages

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::models::{RequestCategory, Row, SchemaDescriptor};

/// Output budget for the classification stage, a bare category label
pub const CLASSIFY_MAX_TOKENS: u32 = 20;
/// Output budget for query synthesis
pub const SYNTHESIZE_MAX_TOKENS: u32 = 100;
/// Output budget for the validation verdict
pub const VALIDATE_MAX_TOKENS: u32 = 50;
/// Output budget for the formatted summary
pub const FORMAT_MAX_TOKENS: u32 = 150;

pub fn classification_prompt(description: &str) -> String {
    format!(
        "Classify the following request:\n\n'{}'\n\nCategories: Data Issue, Trade Failure, Report Generation.",
        description
    )
}

pub fn query_prompt(
    category: RequestCategory,
    parameters: &BTreeMap<String, JsonValue>,
    schema: &SchemaDescriptor,
) -> String {
    format!(
        "You are generating an SQL query for a {} request.\n\
         Based on the schema information:\n\n{}\n\n\
         Create an SQL query using parameters: {}.",
        category,
        schema.render(),
        render_parameters(parameters)
    )
}

pub fn validation_prompt(query: &str) -> String {
    format!(
        "Validate this SQL query:\n\n{}\n\nCheck for security and efficiency.",
        query
    )
}

pub fn summary_prompt(rows: &[Row], category: RequestCategory) -> String {
    format!(
        "Format this data for an Ops team based on a {} request:\n\n\
         Data: {}\n\n\
         Provide a concise summary for non-technical users.",
        category,
        render_rows(rows)
    )
}

fn render_parameters(parameters: &BTreeMap<String, JsonValue>) -> String {
    serde_json::to_string(parameters).unwrap_or_else(|_| "{}".to_string())
}

/// Textual rendering of result rows for prompt embedding. An empty row set
/// renders as an empty array and the prompt simply describes no data.
pub(crate) fn render_rows(rows: &[Row]) -> String {
    serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string())
}
