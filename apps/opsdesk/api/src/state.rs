//! Application state management.
//!
//! The shared state passed to all request handlers. Cloning is inexpensive
//! (Arc clones and a pooled connection handle).

use std::sync::Arc;

use domain_opsdesk::SchemaDescriptor;
use domain_recall::RecallService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// The recall service, constructed once at startup. The vector index it
    /// owns is the only cross-request state in the process; every consumer
    /// receives this same injected instance
    pub recall: Arc<RecallService>,
    /// Queryable schema description handed to the pipeline
    pub schema: SchemaDescriptor,
}
