use rand::rng;
use rand::seq::SliceRandom;

use lingo_core::model::{Task, TaskPayload, Topic};
use storage::repository::ContentRepository;

use crate::error::PoolError;
use crate::exercises::MAX_PAIRS;

/// Images drawn into one image-choice task.
pub const IMAGES_PER_TASK: usize = 3;

/// Tasks drawn into one final-test session.
pub const DEFAULT_SESSION_SIZE: usize = 9;

/// Content categories and draw sizes used to assemble a task pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    match_categories: Vec<String>,
    fill_blank_categories: Vec<String>,
    image_category: String,
    pairs_per_task: usize,
    images_per_task: usize,
    session_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            match_categories: Topic::ALL
                .iter()
                .map(|topic| topic.match_category().to_string())
                .collect(),
            fill_blank_categories: Topic::ALL
                .iter()
                .filter_map(|topic| topic.fill_blank_category())
                .map(str::to_string)
                .collect(),
            image_category: Topic::ALL
                .iter()
                .find_map(|topic| topic.image_category())
                .unwrap_or_default()
                .to_string(),
            pairs_per_task: MAX_PAIRS,
            images_per_task: IMAGES_PER_TASK,
            session_size: DEFAULT_SESSION_SIZE,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn with_match_categories(mut self, categories: Vec<String>) -> Self {
        self.match_categories = categories;
        self
    }

    #[must_use]
    pub fn with_fill_blank_categories(mut self, categories: Vec<String>) -> Self {
        self.fill_blank_categories = categories;
        self
    }

    #[must_use]
    pub fn with_image_category(mut self, category: impl Into<String>) -> Self {
        self.image_category = category.into();
        self
    }

    #[must_use]
    pub fn with_session_size(mut self, size: usize) -> Self {
        self.session_size = size;
        self
    }

    #[must_use]
    pub fn session_size(&self) -> usize {
        self.session_size
    }
}

/// Turns content-pool output into a deduplicated set of task descriptors
/// and draws the order-randomized subset a session runs on.
#[derive(Debug, Clone, Default)]
pub struct TaskFactory {
    config: PoolConfig,
}

impl TaskFactory {
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Assembles the full task pool from the content source.
    ///
    /// Categories that yield no content are silently omitted; the
    /// image-choice task is always appended last.
    ///
    /// # Errors
    ///
    /// Returns `PoolError` when the content source itself fails.
    pub async fn build_pool(
        &self,
        content: &dyn ContentRepository,
    ) -> Result<Vec<Task>, PoolError> {
        let mut tasks = Vec::new();

        for category in &self.config.match_categories {
            let pairs = content
                .fetch_random_pairs(category, self.config.pairs_per_task)
                .await?;
            if pairs.is_empty() {
                tracing::debug!(category = %category, "no pairs, omitting matching task");
                continue;
            }
            tasks.push(Task::new(category.clone(), TaskPayload::Matching(pairs)));
        }

        for category in &self.config.fill_blank_categories {
            match content.fetch_random_fill_blank(category).await? {
                Some(payload) => {
                    tasks.push(Task::new(category.clone(), TaskPayload::FillBlank(payload)));
                }
                None => {
                    tracing::debug!(category = %category, "no rows, omitting fill-blank task");
                }
            }
        }

        let images = content
            .fetch_random_image_choices(&self.config.image_category, self.config.images_per_task)
            .await?;
        tasks.push(Task::new(
            self.config.image_category.clone(),
            TaskPayload::ImageChoice(images),
        ));

        Ok(tasks)
    }

    /// Draws the session's tasks from the pool: a uniform shuffle, then at
    /// most `session_size` tasks without replacement.
    ///
    /// A pool smaller than the session size is returned whole, permuted.
    #[must_use]
    pub fn select_session(&self, mut pool: Vec<Task>) -> Vec<Task> {
        pool.shuffle(&mut rng());
        pool.truncate(self.config.session_size);
        pool
    }
}
