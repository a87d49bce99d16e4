use chrono::NaiveDate;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ProgressRepository, StorageError, TestRecord};
use lingo_core::model::{Topic, UserId};

fn user_i64(user: UserId) -> Result<i64, StorageError> {
    i64::try_from(user.value()).map_err(|_| StorageError::Serialization("user_id overflow".into()))
}

impl SqliteRepository {
    /// Topics the learner has completed, in module order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the query fails or a stored topic key is
    /// unknown.
    pub async fn completed_modules(&self, user: UserId) -> Result<Vec<Topic>, StorageError> {
        let rows = sqlx::query(
            "SELECT topic FROM module_completions WHERE user_id = ?1 ORDER BY module",
        )
        .bind(user_i64(user)?)
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut topics = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row
                .try_get("topic")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let topic = raw
                .parse::<Topic>()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            topics.push(topic);
        }
        Ok(topics)
    }

    /// The learner's recorded test result, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the query fails.
    pub async fn test_record(&self, user: UserId) -> Result<Option<TestRecord>, StorageError> {
        let row = sqlx::query("SELECT score, test_date FROM test_results WHERE user_id = ?1")
            .bind(user_i64(user)?)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let score: i64 = row
            .try_get("score")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let score = u32::try_from(score)
            .map_err(|_| StorageError::Serialization("negative score".into()))?;
        let date: NaiveDate = row
            .try_get("test_date")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(TestRecord { score, date }))
    }
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn mark_module_complete(&self, user: UserId, topic: Topic) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO module_completions (user_id, module, topic)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, module) DO NOTHING
            ",
        )
        .bind(user_i64(user)?)
        .bind(i64::from(topic.module_number()))
        .bind(topic.as_str())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn record_test_result(
        &self,
        user: UserId,
        score: u32,
        date: NaiveDate,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO test_results (user_id, score, test_date)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                score = excluded.score,
                test_date = excluded.test_date
            ",
        )
        .bind(user_i64(user)?)
        .bind(i64::from(score))
        .bind(date)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
