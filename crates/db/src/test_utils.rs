//! Test utilities for database operations.
//!
//! Provides an in-memory SQLite database with the real schema applied, and
//! connection settings for the optional `PostgreSQL` integration tests.

use std::sync::Arc;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::info;

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "folio_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "folio_test".to_string()),
            database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "folio_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory SQLite database with all migrations applied.
    ///
    /// The pool is pinned to a single connection: every connection to
    /// `sqlite::memory:` would otherwise open its own empty database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await?;
        Self::migrated(conn).await
    }

    /// Connect to the `PostgreSQL` test database and apply migrations.
    pub async fn postgres(config: &TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        info!(database = %config.database, "Connected to test database");
        Self::migrated(conn).await
    }

    async fn migrated(conn: DatabaseConnection) -> Result<Self, DbErr> {
        use sea_orm_migration::MigratorTrait;
        crate::migrations::Migrator::up(&conn, None).await?;
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Shared handle for repository constructors.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        self.conn.clone()
    }

    /// Remove all rows, children first.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        for table in ["content_history", "content"] {
            self.conn
                .execute(Statement::from_string(
                    backend,
                    format!("DELETE FROM {table}"),
                ))
                .await?;
        }
        Ok(())
    }
}
