//! SQLite persistence layer for the storyteller admin dashboard.
//!
//! This crate stores administrators, the per-user preference mirrors, agent
//! categories and skeletons, and historical call records using SQLx with
//! SQLite. Preference blocks and transcript turns are kept as JSON documents.
//!
//! # Example
//!
//! ```no_run
//! use database::{admin, models::StoryPreferences, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:storyteller.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let admin = admin::get_admin(db.pool(), "admin-id").await?;
//!     let story = admin.story_preferences_or_default();
//!     admin::set_story_preferences(db.pool(), &admin.id, &story).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod call;
pub mod category;
mod document;
pub mod error;
pub mod models;
pub mod skeleton;
pub mod user_mirror;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Admin, AgentSkeleton, AiPreferences, CallRecord, Category, NewAdmin, PreferenceField,
    SkeletonUpdate, StoryPreferences, UserAgent, UserMirror, Voice,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/storyteller.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(url, pool_size, "Connected to database");

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_migrations_create_empty_store() {
        let db = test_db().await;
        assert_eq!(user_mirror::count_users(db.pool()).await.unwrap(), 0);
        assert!(category::list_categories(db.pool()).await.unwrap().is_empty());
        assert!(call::list_all_calls(db.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_lookup() {
        let db = test_db().await;
        let category = Category {
            id: "childhood".to_string(),
            title: "Childhood".to_string(),
            description: "Early memories".to_string(),
            emoji: "1f9f8".to_string(),
        };
        category::create_category(db.pool(), &category).await.unwrap();

        let fetched = category::get_category(db.pool(), "childhood").await.unwrap();
        assert_eq!(fetched, category);

        let result = category::get_category(db.pool(), "travel").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
