use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ContentRepository, StorageError};
use lingo_core::model::{FillBlankPayload, ImageChoicePayload, MatchingPair};

fn limit_i64(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait::async_trait]
impl ContentRepository for SqliteRepository {
    async fn fetch_random_pairs(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MatchingPair>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT source_word, target_word
            FROM word_pairs
            WHERE category = ?1
            ORDER BY RANDOM()
            LIMIT ?2
            ",
        )
        .bind(category)
        .bind(limit_i64(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            let source: String = row
                .try_get("source_word")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let target: String = row
                .try_get("target_word")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            pairs.push(MatchingPair::new(source, target));
        }
        Ok(pairs)
    }

    async fn fetch_random_fill_blank(
        &self,
        category: &str,
    ) -> Result<Option<FillBlankPayload>, StorageError> {
        let chosen = sqlx::query(
            r"
            SELECT id, sentence_template, correct_word
            FROM fill_blank_items
            WHERE category = ?1
            ORDER BY RANDOM()
            LIMIT 1
            ",
        )
        .bind(category)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(chosen) = chosen else {
            return Ok(None);
        };

        let chosen_id: i64 = chosen
            .try_get("id")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let template: String = chosen
            .try_get("sentence_template")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let correct_word: String = chosen
            .try_get("correct_word")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let distractor_rows = sqlx::query(
            r"
            SELECT correct_word
            FROM fill_blank_items
            WHERE category = ?1 AND id != ?2
            ORDER BY RANDOM()
            LIMIT 3
            ",
        )
        .bind(category)
        .bind(chosen_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut distractors = Vec::with_capacity(distractor_rows.len());
        for row in distractor_rows {
            let word: String = row
                .try_get("correct_word")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            distractors.push(word);
        }

        let payload = FillBlankPayload::new(template, correct_word, distractors)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(payload))
    }

    async fn fetch_random_image_choices(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<ImageChoicePayload>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT image_ref, correct_word
            FROM image_choices
            WHERE category = ?1
            ORDER BY RANDOM()
            LIMIT ?2
            ",
        )
        .bind(category)
        .bind(limit_i64(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let image_ref: String = row
                .try_get("image_ref")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let correct_word: String = row
                .try_get("correct_word")
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            records.push(ImageChoicePayload::new(image_ref, correct_word));
        }
        Ok(records)
    }
}
