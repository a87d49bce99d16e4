use std::sync::Arc;

use lingo_core::model::{Mode, Topic, UserId};
use storage::repository::{ContentRepository, ProgressRepository};

use crate::error::PracticeError;
use crate::exercises::{FillBlankExercise, ImageChoiceExercise, MAX_PAIRS, MatchingExercise};
use crate::factory::IMAGES_PER_TASK;

/// Builds standalone practice exercises for a topic and records module
/// completion.
pub struct PracticeService {
    content: Arc<dyn ContentRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl PracticeService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { content, progress }
    }

    /// Starts a practice matching exercise for the topic.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContent` when the topic's category holds
    /// no pairs, or `PracticeError::Storage` when the source fails.
    pub async fn start_matching(&self, topic: Topic) -> Result<MatchingExercise, PracticeError> {
        let pairs = self
            .content
            .fetch_random_pairs(topic.match_category(), MAX_PAIRS)
            .await?;
        if pairs.is_empty() {
            return Err(PracticeError::NoContent(topic));
        }
        Ok(MatchingExercise::new(&pairs, Mode::Practice))
    }

    /// Starts a practice fill-in-the-blank exercise for the topic.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContent` when the topic carries no
    /// fill-blank content, or `PracticeError::Storage` when the source
    /// fails.
    pub async fn start_fill_blank(&self, topic: Topic) -> Result<FillBlankExercise, PracticeError> {
        let Some(category) = topic.fill_blank_category() else {
            return Err(PracticeError::NoContent(topic));
        };
        let Some(payload) = self.content.fetch_random_fill_blank(category).await? else {
            return Err(PracticeError::NoContent(topic));
        };
        Ok(FillBlankExercise::new(&payload, Mode::Practice))
    }

    /// Starts a practice image-choice exercise for the topic.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoContent` when the topic carries no image
    /// content, or `PracticeError::Storage` when the source fails.
    pub async fn start_image_choice(
        &self,
        topic: Topic,
    ) -> Result<ImageChoiceExercise, PracticeError> {
        let Some(category) = topic.image_category() else {
            return Err(PracticeError::NoContent(topic));
        };
        let records = self
            .content
            .fetch_random_image_choices(category, IMAGES_PER_TASK)
            .await?;
        if records.is_empty() {
            return Err(PracticeError::NoContent(topic));
        }
        Ok(ImageChoiceExercise::new(&records, Mode::Practice))
    }

    /// Records that the learner completed the topic's module.
    ///
    /// A progress-store failure is logged and swallowed; the returned flag
    /// only reports whether the write went through.
    pub async fn complete_module(&self, user: UserId, topic: Topic) -> bool {
        match self.progress.mark_module_complete(user, topic).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(user = %user, topic = %topic, %error, "failed to record module completion");
                false
            }
        }
    }
}
