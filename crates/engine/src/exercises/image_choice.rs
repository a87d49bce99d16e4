use rand::rng;
use rand::seq::SliceRandom;

use lingo_core::model::{ImageChoicePayload, Mode};

use super::{ExerciseResult, Validation};

/// One image with its label options.
#[derive(Debug, Clone)]
pub struct ImageChoiceItem {
    image_ref: String,
    correct_answer: String,
    options: Vec<String>,
    validation: Validation,
    answered: bool,
}

impl ImageChoiceItem {
    #[must_use]
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn validation(&self) -> Validation {
        self.validation
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }
}

/// Image-to-word exercise over a group of images.
///
/// Every item offers the same label set (the group's deduplicated correct
/// answers), shuffled per item. A wrong pick never reverts; in `Practice`
/// mode the item stays open until answered correctly, in `Test` mode the
/// first pick per item is final.
#[derive(Debug)]
pub struct ImageChoiceExercise {
    mode: Mode,
    items: Vec<ImageChoiceItem>,
    answered_count: usize,
    correct_count: usize,
    completed: bool,
    correct: bool,
}

impl ImageChoiceExercise {
    #[must_use]
    pub fn new(records: &[ImageChoicePayload], mode: Mode) -> Self {
        let mut rng = rng();

        // label set shared by every item, first occurrence wins
        let mut labels: Vec<String> = Vec::new();
        for record in records {
            if !labels.iter().any(|label| label == record.correct_answer()) {
                labels.push(record.correct_answer().to_string());
            }
        }

        let mut order: Vec<&ImageChoicePayload> = records.iter().collect();
        order.shuffle(&mut rng);

        let items: Vec<ImageChoiceItem> = order
            .into_iter()
            .map(|record| {
                let mut options = labels.clone();
                options.shuffle(&mut rng);
                ImageChoiceItem {
                    image_ref: record.image_ref().to_string(),
                    correct_answer: record.correct_answer().to_string(),
                    options,
                    validation: Validation::Unchecked,
                    answered: false,
                }
            })
            .collect();

        // an empty group has nothing left to answer
        let completed = items.is_empty();
        Self {
            mode,
            items,
            answered_count: 0,
            correct_count: 0,
            completed,
            correct: completed,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ImageChoiceItem] {
        &self.items
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn result(&self) -> ExerciseResult {
        ExerciseResult {
            completed: self.completed,
            correct: self.correct,
        }
    }

    /// Submits `choice` as the label for the item at `item_index`.
    pub fn answer_item(&mut self, item_index: usize, choice: &str) {
        if self.completed {
            tracing::debug!("answer on a completed image-choice exercise ignored");
            return;
        }
        let is_test = self.mode.is_test();
        let Some(item) = self.items.get_mut(item_index) else {
            return;
        };
        if item.answered {
            return;
        }

        if choice == item.correct_answer {
            item.validation = Validation::Correct;
            item.answered = true;
            self.correct_count += 1;
            self.answered_count += 1;
        } else {
            item.validation = Validation::Incorrect;
            if is_test {
                item.answered = true;
                self.answered_count += 1;
            }
        }
        self.check_completion();
    }

    fn check_completion(&mut self) {
        let total = self.items.len();
        if self.correct_count == total {
            self.completed = true;
            self.correct = true;
        } else if self.mode.is_test() && self.answered_count == total {
            self.completed = true;
            self.correct = false;
        }
    }
}
