pub mod config;
pub mod connector;
pub mod health;
pub mod query;

// Re-export the connection handle so consumers don't need a direct
// sea-orm dependency for plumbing
pub use sea_orm::DatabaseConnection;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
    connect_with_retry,
};
pub use health::check_health;
pub use query::fetch_rows;
