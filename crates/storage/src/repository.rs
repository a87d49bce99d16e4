use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use lingo_core::model::{FillBlankPayload, ImageChoicePayload, MatchingPair, Topic, UserId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one fill-in-the-blank row.
///
/// A row stores its own sentence and answer; distractors are drawn from
/// the *other* rows of the same category at fetch time, excluding the
/// chosen row by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankRow {
    pub template: String,
    pub answer: String,
}

/// A learner's latest final-test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub score: u32,
    pub date: NaiveDate,
}

/// Read side of the content pool, keyed by category name.
///
/// "Random" here is a selection contract, not a distribution guarantee;
/// callers shuffle again where presentation order matters.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch up to `limit` random word pairs from a category.
    ///
    /// An unknown or empty category yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store fails.
    async fn fetch_random_pairs(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MatchingPair>, StorageError>;

    /// Fetch one random fill-in-the-blank record plus three distractor
    /// words drawn from other records of the same category.
    ///
    /// Returns `None` when the category has no rows.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store fails or a stored row
    /// cannot be turned into a valid payload.
    async fn fetch_random_fill_blank(
        &self,
        category: &str,
    ) -> Result<Option<FillBlankPayload>, StorageError>;

    /// Fetch up to `limit` random image-choice records from a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store fails.
    async fn fetch_random_image_choices(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<ImageChoicePayload>, StorageError>;
}

/// Write side for learner progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Record that a learner completed a topic's module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store fails.
    async fn mark_module_complete(&self, user: UserId, topic: Topic) -> Result<(), StorageError>;

    /// Record a learner's final-test score and date, replacing any prior
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backing store fails.
    async fn record_test_result(
        &self,
        user: UserId,
        score: u32,
        date: NaiveDate,
    ) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    pairs: Arc<Mutex<HashMap<String, Vec<MatchingPair>>>>,
    fill_blanks: Arc<Mutex<HashMap<String, Vec<FillBlankRow>>>>,
    images: Arc<Mutex<HashMap<String, Vec<ImageChoicePayload>>>>,
    modules: Arc<Mutex<HashMap<UserId, Vec<Topic>>>>,
    tests: Arc<Mutex<HashMap<UserId, TestRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_pairs(&self, category: &str, pairs: Vec<MatchingPair>) {
        let mut guard = self.pairs.lock().expect("pairs lock poisoned");
        guard.entry(category.to_string()).or_default().extend(pairs);
    }

    pub fn insert_fill_blank_rows(&self, category: &str, rows: Vec<FillBlankRow>) {
        let mut guard = self.fill_blanks.lock().expect("fill_blanks lock poisoned");
        guard.entry(category.to_string()).or_default().extend(rows);
    }

    pub fn insert_image_choices(&self, category: &str, records: Vec<ImageChoicePayload>) {
        let mut guard = self.images.lock().expect("images lock poisoned");
        guard
            .entry(category.to_string())
            .or_default()
            .extend(records);
    }

    /// Topics the learner has completed, for assertions in tests.
    #[must_use]
    pub fn completed_modules(&self, user: UserId) -> Vec<Topic> {
        let guard = self.modules.lock().expect("modules lock poisoned");
        guard.get(&user).cloned().unwrap_or_default()
    }

    /// The learner's recorded test result, if any.
    #[must_use]
    pub fn test_record(&self, user: UserId) -> Option<TestRecord> {
        let guard = self.tests.lock().expect("tests lock poisoned");
        guard.get(&user).copied()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn fetch_random_pairs(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<MatchingPair>, StorageError> {
        let guard = self
            .pairs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.get(category).cloned().unwrap_or_default();
        rows.shuffle(&mut rng());
        rows.truncate(limit);
        Ok(rows)
    }

    async fn fetch_random_fill_blank(
        &self,
        category: &str,
    ) -> Result<Option<FillBlankPayload>, StorageError> {
        let guard = self
            .fill_blanks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let Some(rows) = guard.get(category).filter(|rows| !rows.is_empty()) else {
            return Ok(None);
        };

        let chosen_index = rng().random_range(0..rows.len());
        let chosen = rows[chosen_index].clone();

        let mut distractors: Vec<String> = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != chosen_index)
            .map(|(_, row)| row.answer.clone())
            .collect();
        distractors.shuffle(&mut rng());
        distractors.truncate(3);

        let payload = FillBlankPayload::new(chosen.template, chosen.answer, distractors)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(payload))
    }

    async fn fetch_random_image_choices(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<ImageChoicePayload>, StorageError> {
        let guard = self
            .images
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.get(category).cloned().unwrap_or_default();
        rows.shuffle(&mut rng());
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn mark_module_complete(&self, user: UserId, topic: Topic) -> Result<(), StorageError> {
        let mut guard = self
            .modules
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let done = guard.entry(user).or_default();
        if !done.contains(&topic) {
            done.push(topic);
        }
        Ok(())
    }

    async fn record_test_result(
        &self,
        user: UserId,
        score: u32,
        date: NaiveDate,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(user, TestRecord { score, date });
        Ok(())
    }
}

/// Aggregates content and progress repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { content, progress }
    }
}
