use std::str::FromStr;

use async_trait::async_trait;
use pool_core::db::repository::{EstimateRepository, RepositoryError};
use pool_core::db::{DbConfig, RepositoryFactory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`pool_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use pool_core::db::RepositoryRegistry;
/// use pool_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted values:
    /// * A bare file path, e.g. `"estimates.db"`; the file is created if it
    ///   does not exist.
    /// * A sqlx URL such as `"sqlite://data/estimates.db"`.
    /// * `":memory:"` for an ephemeral database.
    ///
    /// Migrations run before the repository is returned.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        let in_memory = config.connection_string.contains(":memory:");
        let options = SqliteConnectOptions::from_str(&config.connection_string)
            .map_err(|e| RepositoryError::Configuration(e.to_string()))?
            .create_if_missing(true);

        // An in-memory database lives only as long as its single connection.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let repo = SqliteRepository::new_with_pool(pool);
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(connection = %config.connection_string, "Opened SQLite repository");
        Ok(Box::new(repo))
    }
}
