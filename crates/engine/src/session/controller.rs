use std::fmt;

use lingo_core::model::{Mode, Task};

use super::progress::SessionProgress;
use crate::exercises::Exercise;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A live exercise awaits answers for the slot under the cursor.
    AwaitingAnswer,
    /// Every slot has a recorded result; the tally is available.
    Finished,
    /// The session was abandoned; no tally is produced.
    Aborted,
}

/// Drives an ordered sequence of tasks through exercises, one at a time.
///
/// The controller exclusively owns the task list and the live exercise.
/// Invariants: the cursor only increases; `results[i]` is written exactly
/// once, immediately before advancing past slot `i`; the session is
/// terminal exactly when the cursor has passed every slot.
///
/// Sessions run in `Test` mode; standalone practice exercises are built by
/// `PracticeService` instead.
pub struct SessionController {
    tasks: Vec<Task>,
    cursor: usize,
    results: Vec<bool>,
    current: Option<Exercise>,
    aborted: bool,
}

impl SessionController {
    /// Starts a session over the given tasks.
    ///
    /// An empty task list finishes immediately with a tally of zero.
    #[must_use]
    pub fn start(tasks: Vec<Task>) -> Self {
        let current = tasks.first().map(|task| Exercise::from_task(task, Mode::Test));
        Self {
            tasks,
            cursor: 0,
            results: Vec::new(),
            current,
            aborted: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.aborted {
            SessionPhase::Aborted
        } else if self.cursor == self.tasks.len() {
            SessionPhase::Finished
        } else {
            SessionPhase::AwaitingAnswer
        }
    }

    #[must_use]
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.get(self.cursor)
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current.as_ref()
    }

    pub fn current_exercise_mut(&mut self) -> Option<&mut Exercise> {
        self.current.as_mut()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Per-slot outcomes recorded so far, one entry per passed slot.
    #[must_use]
    pub fn results(&self) -> &[bool] {
        &self.results
    }

    /// Records the current exercise's outcome and moves to the next slot.
    ///
    /// An exercise that never reached a terminal result is recorded as
    /// incorrect, a skip rather than an error. Advancing a finished or
    /// aborted session is ignored.
    pub fn advance(&mut self) {
        match self.phase() {
            SessionPhase::AwaitingAnswer => {}
            SessionPhase::Finished | SessionPhase::Aborted => {
                tracing::debug!("advance on a terminal session ignored");
                return;
            }
        }

        let correct = self
            .current
            .as_ref()
            .map(|exercise| {
                let result = exercise.result();
                result.completed && result.correct
            })
            .unwrap_or(false);
        self.results.push(correct);
        self.cursor += 1;

        if self.cursor == self.tasks.len() {
            self.current = None;
            tracing::info!(tally = self.tally().unwrap_or(0), total = self.tasks.len(), "session finished");
        } else {
            self.current = Some(Exercise::from_task(&self.tasks[self.cursor], Mode::Test));
        }
    }

    /// Abandons the session without writing remaining results.
    ///
    /// Dropping the live exercise discards its pending feedback reverts.
    pub fn exit_early(&mut self) {
        if self.phase() != SessionPhase::AwaitingAnswer {
            return;
        }
        self.aborted = true;
        self.current = None;
    }

    /// Count of correct results; available only once the session finished.
    #[must_use]
    pub fn tally(&self) -> Option<u32> {
        if self.aborted || self.cursor != self.tasks.len() {
            return None;
        }
        let count = self.results.iter().filter(|correct| **correct).count();
        Some(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.tasks.len(),
            answered: self.results.len(),
            remaining: self.tasks.len().saturating_sub(self.cursor),
            is_finished: self.phase() == SessionPhase::Finished,
        }
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("tasks_len", &self.tasks.len())
            .field("cursor", &self.cursor)
            .field("results_len", &self.results.len())
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lingo_core::model::{
        FillBlankPayload, ImageChoicePayload, MatchingPair, TaskKind, TaskPayload,
    };
    use lingo_core::time::fixed_now;

    fn fill_blank_task() -> Task {
        let payload = FillBlankPayload::new(
            "min ___ ashyym",
            "ipi",
            vec!["su".into(), "it".into(), "alma".into()],
        )
        .unwrap();
        Task::new("phrases_fill_blank", TaskPayload::FillBlank(payload))
    }

    fn matching_task() -> Task {
        Task::new(
            "family_match",
            TaskPayload::Matching(vec![
                MatchingPair::new("ana", "mother"),
                MatchingPair::new("ata", "father"),
            ]),
        )
    }

    fn image_task() -> Task {
        Task::new(
            "image_choice_food",
            TaskPayload::ImageChoice(vec![
                ImageChoicePayload::new("bread", "ipi"),
                ImageChoicePayload::new("milk", "sot"),
            ]),
        )
    }

    fn answer_current_correctly(session: &mut SessionController) {
        let now = fixed_now();
        match session.current_exercise_mut().expect("live exercise") {
            Exercise::Matching(exercise) => {
                for source in 0..exercise.source_items().len() {
                    let id = exercise.source_items()[source].id();
                    let target = exercise
                        .target_items()
                        .iter()
                        .position(|item| item.id() == id)
                        .unwrap();
                    exercise.select_source(source, now);
                    exercise.select_target(target, now);
                }
            }
            Exercise::FillBlank(exercise) => {
                let index = exercise
                    .options()
                    .iter()
                    .position(|option| option.is_correct())
                    .unwrap();
                exercise.select_option(index, now);
            }
            Exercise::ImageChoice(exercise) => {
                // labels as seeded by `image_task`
                let known = [("bread", "ipi"), ("milk", "sot")];
                for index in 0..exercise.items().len() {
                    let image_ref = exercise.items()[index].image_ref().to_string();
                    if let Some((_, label)) = known.iter().find(|(img, _)| *img == image_ref) {
                        exercise.answer_item(index, label);
                    }
                }
            }
        }
    }

    #[test]
    fn empty_task_list_finishes_immediately() {
        let session = SessionController::start(Vec::new());
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.tally(), Some(0));
        assert!(session.current_exercise().is_none());
    }

    #[test]
    fn results_track_the_cursor() {
        let mut session =
            SessionController::start(vec![fill_blank_task(), matching_task(), image_task()]);
        assert_eq!(session.results().len(), session.cursor());

        session.advance();
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.cursor(), 1);

        session.advance();
        session.advance();
        assert_eq!(session.results().len(), 3);
        assert_eq!(session.phase(), SessionPhase::Finished);
    }

    #[test]
    fn unanswered_slots_are_recorded_as_incorrect() {
        let mut session = SessionController::start(vec![fill_blank_task(), fill_blank_task()]);
        answer_current_correctly(&mut session);
        session.advance();
        // skip the second exercise entirely
        session.advance();

        assert_eq!(session.results(), &[true, false]);
        assert_eq!(session.tally(), Some(1));
    }

    #[test]
    fn advance_after_finished_is_idempotent() {
        let mut session = SessionController::start(vec![fill_blank_task()]);
        session.advance();
        assert_eq!(session.phase(), SessionPhase::Finished);

        let results_before = session.results().to_vec();
        let tally_before = session.tally();
        for _ in 0..5 {
            session.advance();
        }
        assert_eq!(session.results(), results_before.as_slice());
        assert_eq!(session.tally(), tally_before);
    }

    #[test]
    fn exit_early_produces_no_tally() {
        let mut session = SessionController::start(vec![fill_blank_task(), matching_task()]);
        session.advance();
        session.exit_early();

        assert_eq!(session.phase(), SessionPhase::Aborted);
        assert_eq!(session.tally(), None);
        assert!(session.current_exercise().is_none());

        // further advances stay ignored
        session.advance();
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn each_slot_gets_the_exercise_for_its_task() {
        let mut session = SessionController::start(vec![matching_task(), image_task()]);
        assert_eq!(
            session.current_exercise().unwrap().kind(),
            TaskKind::MatchTerms
        );

        session.advance();
        assert_eq!(
            session.current_exercise().unwrap().kind(),
            TaskKind::ImageChoice
        );
    }

    #[test]
    fn progress_reflects_cursor_movement() {
        let mut session = SessionController::start(vec![fill_blank_task(), fill_blank_task()]);
        let progress = session.progress();
        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_finished);

        session.advance();
        session.advance();
        let progress = session.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_finished);
    }

    #[test]
    fn timed_feedback_survives_until_processed() {
        let now = fixed_now();
        let mut session = SessionController::start(vec![fill_blank_task()]);
        let Some(Exercise::FillBlank(exercise)) = session.current_exercise_mut() else {
            panic!("expected fill-blank exercise");
        };
        let wrong = exercise
            .options()
            .iter()
            .position(|option| !option.is_correct())
            .unwrap();
        exercise.select_option(wrong, now);

        let later = now + Duration::milliseconds(1200);
        session
            .current_exercise_mut()
            .unwrap()
            .process_due_reverts(later);
        let Some(Exercise::FillBlank(exercise)) = session.current_exercise() else {
            panic!("expected fill-blank exercise");
        };
        assert!(
            exercise
                .options()
                .iter()
                .all(|option| option.validation() != crate::Validation::Incorrect)
        );
    }
}
