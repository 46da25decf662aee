//! Test utilities for database operations.
//!
//! Helpers for integration tests that run against a real `PostgreSQL`.

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set, Statement,
};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::info;

use crate::entities::user;
use crate::migrations::Migrator;
use crate::repositories::UserRepository;

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
            username: std::env::var("TEST_DB_USER").unwrap_or_else(|_| "feed_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "feed_test".to_string()),
            database: std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "feed_test".to_string()),
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
    /// Connect with the default configuration and run all migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(&TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and run all migrations.
    pub async fn with_config(config: &TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to migrated test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Shared connection handle for building repositories.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Remove every row from the feed tables, leaving the schema in place.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        self.conn
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                r#"TRUNCATE TABLE "notification", "comment", "like", "post", "user" CASCADE"#
                    .to_string(),
            ))
            .await?;

        info!("Cleaned up test database");
        Ok(())
    }

    /// Insert a user whose bearer token is `{username}-token`.
    pub async fn seed_user(&self, id: &str, username: &str) -> Result<user::Model, DbErr> {
        let repo = UserRepository::new(self.connection());
        repo.create(user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(username.to_string()),
            name: Set(Some(username.to_string())),
            bio: Set(None),
            image: Set(None),
            location: Set(None),
            website: Set(None),
            token: Set(Some(format!("{username}-token"))),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .map_err(|e| DbErr::Custom(e.to_string()))
    }
}
