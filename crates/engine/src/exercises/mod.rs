mod fill_blank;
mod image_choice;
mod matching;
mod revert;

pub use fill_blank::{FillBlankExercise, OptionState};
pub use image_choice::{ImageChoiceExercise, ImageChoiceItem};
pub use matching::{MAX_PAIRS, MatchColumn, MatchItem, MatchingExercise};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lingo_core::model::{Mode, Task, TaskKind, TaskPayload};

/// Check state of a single answer option or image item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    #[default]
    Unchecked,
    Correct,
    Incorrect,
}

/// Terminal summary of one exercise instance.
///
/// `correct` is only meaningful once `completed` is true; an exercise
/// abandoned before reaching a terminal state reads as incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub completed: bool,
    pub correct: bool,
}

/// The live, stateful instantiation of a task, one variant per task kind.
///
/// Every variant owns its own shuffle, input handling, and completion
/// state; the session controller only dispatches on the closed set.
#[derive(Debug)]
pub enum Exercise {
    Matching(MatchingExercise),
    FillBlank(FillBlankExercise),
    ImageChoice(ImageChoiceExercise),
}

impl Exercise {
    /// Instantiates the exercise matching the task's payload.
    #[must_use]
    pub fn from_task(task: &Task, mode: Mode) -> Self {
        match task.payload() {
            TaskPayload::Matching(pairs) => Exercise::Matching(MatchingExercise::new(pairs, mode)),
            TaskPayload::FillBlank(payload) => {
                Exercise::FillBlank(FillBlankExercise::new(payload, mode))
            }
            TaskPayload::ImageChoice(records) => {
                Exercise::ImageChoice(ImageChoiceExercise::new(records, mode))
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            Exercise::Matching(_) => TaskKind::MatchTerms,
            Exercise::FillBlank(_) => TaskKind::FillInBlank,
            Exercise::ImageChoice(_) => TaskKind::ImageChoice,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.result().completed
    }

    /// Snapshot of the exercise outcome so far.
    #[must_use]
    pub fn result(&self) -> ExerciseResult {
        match self {
            Exercise::Matching(e) => e.result(),
            Exercise::FillBlank(e) => e.result(),
            Exercise::ImageChoice(e) => e.result(),
        }
    }

    /// Applies any transient-feedback reverts that have come due.
    ///
    /// Image-choice feedback never reverts, so the variant is a no-op.
    pub fn process_due_reverts(&mut self, now: DateTime<Utc>) {
        match self {
            Exercise::Matching(e) => e.process_due_reverts(now),
            Exercise::FillBlank(e) => e.process_due_reverts(now),
            Exercise::ImageChoice(_) => {}
        }
    }
}
