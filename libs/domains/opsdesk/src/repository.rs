use async_trait::async_trait;

use crate::error::OpsResult;
use crate::models::Row;

/// Data-store capability for the execution stage.
///
/// A validated query string goes in; the ordered result rows come out, each
/// a column-name → value mapping. The connection an implementation uses is
/// scoped to the call; nothing is held across requests. Implementations
/// never retry: the statement may have partially applied on the server, and
/// execution must stay at-most-once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OpsRepository: Send + Sync {
    /// Execute a query and fetch all result rows
    async fn run_query(&self, query: &str) -> OpsResult<Vec<Row>>;
}
