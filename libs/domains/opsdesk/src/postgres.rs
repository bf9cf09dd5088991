use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::OpsResult;
use crate::models::Row;
use crate::repository::OpsRepository;

/// PostgreSQL implementation of OpsRepository
#[derive(Clone)]
pub struct PgOpsRepository {
    db: DatabaseConnection,
}

impl PgOpsRepository {
    /// Create a new PostgreSQL ops repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OpsRepository for PgOpsRepository {
    async fn run_query(&self, query: &str) -> OpsResult<Vec<Row>> {
        let rows = database::postgres::fetch_rows(&self.db, query).await?;
        Ok(rows)
    }
}
