use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{ContentRepository, ProgressRepository, Storage, StorageError};
use lingo_core::model::{ImageChoicePayload, MatchingPair};

mod content_repo;
mod migrate;
mod progress_repo;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// if enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }

    /// Insert one word pair into a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the insert fails.
    pub async fn insert_pair(
        &self,
        category: &str,
        pair: &MatchingPair,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO word_pairs (category, source_word, target_word) VALUES (?1, ?2, ?3)",
        )
        .bind(category)
        .bind(pair.source())
        .bind(pair.target())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Insert one fill-in-the-blank row into a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the insert fails.
    pub async fn insert_fill_blank(
        &self,
        category: &str,
        template: &str,
        correct_word: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO fill_blank_items (category, sentence_template, correct_word) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(category)
        .bind(template)
        .bind(correct_word)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    /// Insert one image-choice record into a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the insert fails.
    pub async fn insert_image_choice(
        &self,
        category: &str,
        record: &ImageChoicePayload,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO image_choices (category, image_ref, correct_word) VALUES (?1, ?2, ?3)",
        )
        .bind(category)
        .bind(record.image_ref())
        .bind(record.correct_answer())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Ok(Self { content, progress })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }
}
