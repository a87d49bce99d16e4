use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;

use lingo_core::model::{FillBlankPayload, Mode};

use super::revert::{RevertQueue, revert_delay};
use super::{ExerciseResult, Validation};

/// One answer option offered under the sentence template.
#[derive(Debug, Clone)]
pub struct OptionState {
    text: String,
    is_correct: bool,
    validation: Validation,
    selectable: bool,
    generation: u64,
}

impl OptionState {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn validation(&self) -> Validation {
        self.validation
    }

    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }
}

/// Fill-in-the-blank exercise: one sentence, one correct word, three
/// distractors.
///
/// The correct option always locks the exercise as correct. A wrong option
/// in `Practice` mode shows transient feedback and reverts after a fixed
/// delay, leaving the exercise open; in `Test` mode the first answer is
/// final either way.
#[derive(Debug)]
pub struct FillBlankExercise {
    mode: Mode,
    template: String,
    options: Vec<OptionState>,
    completed: bool,
    correct: bool,
    reverts: RevertQueue<usize>,
}

impl FillBlankExercise {
    #[must_use]
    pub fn new(payload: &FillBlankPayload, mode: Mode) -> Self {
        let mut texts: Vec<String> = payload.distractors().to_vec();
        texts.push(payload.correct_answer().to_string());
        texts.shuffle(&mut rng());

        let options = texts
            .into_iter()
            .map(|text| OptionState {
                is_correct: text == payload.correct_answer(),
                text,
                validation: Validation::Unchecked,
                selectable: true,
                generation: 0,
            })
            .collect();

        Self {
            mode,
            template: payload.template().to_string(),
            options,
            completed: false,
            correct: false,
            reverts: RevertQueue::new(),
        }
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn options(&self) -> &[OptionState] {
        &self.options
    }

    #[must_use]
    pub fn result(&self) -> ExerciseResult {
        ExerciseResult {
            completed: self.completed,
            correct: self.correct,
        }
    }

    /// Submits the option at `index` as the answer.
    pub fn select_option(&mut self, index: usize, now: DateTime<Utc>) {
        self.process_due_reverts(now);
        if self.completed {
            tracing::debug!("selection on a completed fill-blank exercise ignored");
            return;
        }
        let Some(is_correct) = self.options.get(index).map(OptionState::is_correct) else {
            return;
        };
        if !self.options[index].selectable {
            return;
        }

        if is_correct {
            self.options[index].validation = Validation::Correct;
            self.lock(true);
        } else if self.mode.is_test() {
            self.options[index].validation = Validation::Incorrect;
            self.lock(false);
        } else {
            let option = &mut self.options[index];
            option.validation = Validation::Incorrect;
            option.generation += 1;
            let generation = option.generation;
            self.reverts.schedule(index, generation, now + revert_delay());
        }
    }

    fn lock(&mut self, correct: bool) {
        self.completed = true;
        self.correct = correct;
        for option in &mut self.options {
            option.selectable = false;
        }
    }

    /// Reverts transient incorrect marks whose delay has elapsed.
    ///
    /// A stale revert (the option was re-marked since scheduling) is a no-op.
    pub fn process_due_reverts(&mut self, now: DateTime<Utc>) {
        for entry in self.reverts.drain_due(now) {
            if let Some(option) = self.options.get_mut(entry.key) {
                if option.generation == entry.generation
                    && option.validation == Validation::Incorrect
                {
                    option.validation = Validation::Unchecked;
                }
            }
        }
    }
}
