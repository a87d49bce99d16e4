use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;

use lingo_core::model::{MatchingPair, Mode};

use super::ExerciseResult;
use super::revert::{RevertQueue, revert_delay};

/// Upper bound on pairs presented by one matching exercise.
pub const MAX_PAIRS: usize = 6;

/// One selectable entry in a matching column.
///
/// The two items forming a correct pair share the same `id` across the
/// source and target columns.
#[derive(Debug, Clone)]
pub struct MatchItem {
    id: usize,
    text: String,
    matched: bool,
    invalid_flash: bool,
    flash_generation: u64,
}

impl MatchItem {
    fn new(id: usize, text: String) -> Self {
        Self {
            id,
            text,
            matched: false,
            invalid_flash: false,
            flash_generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn is_invalid_flash(&self) -> bool {
        self.invalid_flash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchColumn {
    Source,
    Target,
}

/// Term-matching exercise over two columns of words.
///
/// The caller holds at most one live selection per column; an evaluation
/// fires as soon as both columns have one. A correct pair locks both items,
/// a wrong pair flashes both. In `Practice` mode the flash reverts after a
/// fixed delay and the pair stays in play; in `Test` mode the flash is a
/// permanent miss marker counted against the result.
#[derive(Debug)]
pub struct MatchingExercise {
    mode: Mode,
    source_items: Vec<MatchItem>,
    target_items: Vec<MatchItem>,
    selected_source: Option<usize>,
    selected_target: Option<usize>,
    correctly_matched: usize,
    incorrectly_matched: usize,
    total_pairs: usize,
    completed: bool,
    correct: bool,
    reverts: RevertQueue<(MatchColumn, usize)>,
}

impl MatchingExercise {
    /// Builds the exercise from a pool of pairs.
    ///
    /// Pair order is shuffled and truncated to [`MAX_PAIRS`]; the target
    /// column is shuffled again independently so column order never
    /// reveals the pairing.
    #[must_use]
    pub fn new(pairs: &[MatchingPair], mode: Mode) -> Self {
        let mut rng = rng();
        let mut pool: Vec<MatchingPair> = pairs.to_vec();
        pool.shuffle(&mut rng);
        pool.truncate(MAX_PAIRS);

        let mut source_items = Vec::with_capacity(pool.len());
        let mut target_items = Vec::with_capacity(pool.len());
        for (id, pair) in pool.iter().enumerate() {
            source_items.push(MatchItem::new(id, pair.source().to_string()));
            target_items.push(MatchItem::new(id, pair.target().to_string()));
        }
        target_items.shuffle(&mut rng);

        let total_pairs = pool.len();
        Self {
            mode,
            source_items,
            target_items,
            selected_source: None,
            selected_target: None,
            correctly_matched: 0,
            incorrectly_matched: 0,
            total_pairs,
            // nothing to match means nothing left to get right
            completed: total_pairs == 0,
            correct: total_pairs == 0,
            reverts: RevertQueue::new(),
        }
    }

    #[must_use]
    pub fn source_items(&self) -> &[MatchItem] {
        &self.source_items
    }

    #[must_use]
    pub fn target_items(&self) -> &[MatchItem] {
        &self.target_items
    }

    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    #[must_use]
    pub fn correctly_matched(&self) -> usize {
        self.correctly_matched
    }

    #[must_use]
    pub fn incorrectly_matched(&self) -> usize {
        self.incorrectly_matched
    }

    #[must_use]
    pub fn result(&self) -> ExerciseResult {
        ExerciseResult {
            completed: self.completed,
            correct: self.correct,
        }
    }

    /// Selects an item in the source column, replacing any prior unconsumed
    /// selection there.
    pub fn select_source(&mut self, index: usize, now: DateTime<Utc>) {
        self.select(MatchColumn::Source, index, now);
    }

    /// Selects an item in the target column, replacing any prior unconsumed
    /// selection there.
    pub fn select_target(&mut self, index: usize, now: DateTime<Utc>) {
        self.select(MatchColumn::Target, index, now);
    }

    fn select(&mut self, column: MatchColumn, index: usize, now: DateTime<Utc>) {
        self.process_due_reverts(now);
        if self.completed {
            tracing::debug!("selection on a completed matching exercise ignored");
            return;
        }
        let items = match column {
            MatchColumn::Source => &self.source_items,
            MatchColumn::Target => &self.target_items,
        };
        let Some(item) = items.get(index) else {
            return;
        };
        if item.matched {
            return;
        }
        match column {
            MatchColumn::Source => self.selected_source = Some(index),
            MatchColumn::Target => self.selected_target = Some(index),
        }
        self.evaluate_selection(now);
    }

    /// Evaluates once both columns hold a live selection.
    fn evaluate_selection(&mut self, now: DateTime<Utc>) {
        let (Some(source), Some(target)) = (self.selected_source, self.selected_target) else {
            return;
        };

        if self.source_items[source].id == self.target_items[target].id {
            self.source_items[source].matched = true;
            self.source_items[source].invalid_flash = false;
            self.target_items[target].matched = true;
            self.target_items[target].invalid_flash = false;
            self.correctly_matched += 1;
            if self.correctly_matched == self.total_pairs {
                self.completed = true;
                self.correct = true;
            }
        } else {
            self.flash(MatchColumn::Source, source, now);
            self.flash(MatchColumn::Target, target, now);
            if self.mode.is_test() {
                self.incorrectly_matched += 1;
                if self.correctly_matched + self.incorrectly_matched >= self.total_pairs {
                    self.completed = true;
                    self.correct = false;
                }
            }
        }

        self.selected_source = None;
        self.selected_target = None;
    }

    fn flash(&mut self, column: MatchColumn, index: usize, now: DateTime<Utc>) {
        let generation = {
            let item = match column {
                MatchColumn::Source => &mut self.source_items[index],
                MatchColumn::Target => &mut self.target_items[index],
            };
            item.invalid_flash = true;
            item.flash_generation += 1;
            item.flash_generation
        };
        if !self.mode.is_test() {
            self.reverts
                .schedule((column, index), generation, now + revert_delay());
        }
    }

    /// Clears invalid flashes whose revert delay has elapsed.
    ///
    /// A stale revert (the item was re-flashed since scheduling) is a no-op.
    pub fn process_due_reverts(&mut self, now: DateTime<Utc>) {
        for entry in self.reverts.drain_due(now) {
            let (column, index) = entry.key;
            let item = match column {
                MatchColumn::Source => self.source_items.get_mut(index),
                MatchColumn::Target => self.target_items.get_mut(index),
            };
            if let Some(item) = item {
                if item.flash_generation == entry.generation && !item.matched {
                    item.invalid_flash = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lingo_core::time::fixed_now;

    fn five_pairs() -> Vec<MatchingPair> {
        vec![
            MatchingPair::new("a", "1"),
            MatchingPair::new("b", "2"),
            MatchingPair::new("c", "3"),
            MatchingPair::new("d", "4"),
            MatchingPair::new("e", "5"),
        ]
    }

    fn source_index(exercise: &MatchingExercise, text: &str) -> usize {
        exercise
            .source_items()
            .iter()
            .position(|item| item.text() == text)
            .expect("source item present")
    }

    fn target_index(exercise: &MatchingExercise, text: &str) -> usize {
        exercise
            .target_items()
            .iter()
            .position(|item| item.text() == text)
            .expect("target item present")
    }

    #[test]
    fn columns_share_ids_per_pair() {
        let exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);
        assert_eq!(exercise.total_pairs(), 5);

        let source = source_index(&exercise, "a");
        let target = target_index(&exercise, "1");
        assert_eq!(
            exercise.source_items()[source].id(),
            exercise.target_items()[target].id()
        );
    }

    #[test]
    fn truncates_to_six_pairs() {
        let pairs: Vec<MatchingPair> = (0..10)
            .map(|i| MatchingPair::new(format!("s{i}"), format!("t{i}")))
            .collect();
        let exercise = MatchingExercise::new(&pairs, Mode::Practice);
        assert_eq!(exercise.total_pairs(), MAX_PAIRS);
        assert_eq!(exercise.source_items().len(), MAX_PAIRS);
        assert_eq!(exercise.target_items().len(), MAX_PAIRS);
    }

    #[test]
    fn correct_pair_locks_both_items() {
        let now = fixed_now();
        let mut exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);

        let source = source_index(&exercise, "a");
        let target = target_index(&exercise, "1");
        exercise.select_source(source, now);
        exercise.select_target(target, now);

        assert!(exercise.source_items()[source].is_matched());
        assert!(exercise.target_items()[target].is_matched());
        assert_eq!(exercise.correctly_matched(), 1);
        assert!(!exercise.result().completed);
    }

    #[test]
    fn wrong_pair_flashes_without_counting_in_practice() {
        let now = fixed_now();
        let mut exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);

        let source = source_index(&exercise, "b");
        let target = target_index(&exercise, "3");
        exercise.select_source(source, now);
        exercise.select_target(target, now);

        assert!(exercise.source_items()[source].is_invalid_flash());
        assert!(exercise.target_items()[target].is_invalid_flash());
        assert_eq!(exercise.correctly_matched(), 0);
        assert_eq!(exercise.incorrectly_matched(), 0);
    }

    #[test]
    fn practice_flash_reverts_after_delay() {
        let now = fixed_now();
        let mut exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);

        let source = source_index(&exercise, "b");
        let target = target_index(&exercise, "3");
        exercise.select_source(source, now);
        exercise.select_target(target, now);

        exercise.process_due_reverts(now + Duration::milliseconds(999));
        assert!(exercise.source_items()[source].is_invalid_flash());

        exercise.process_due_reverts(now + Duration::milliseconds(1000));
        assert!(!exercise.source_items()[source].is_invalid_flash());
        assert!(!exercise.target_items()[target].is_invalid_flash());
    }

    #[test]
    fn reflash_supersedes_pending_revert() {
        let now = fixed_now();
        let mut exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);

        let source = source_index(&exercise, "b");
        exercise.select_source(source, now);
        exercise.select_target(target_index(&exercise, "3"), now);

        // re-flash the same source item half way through the first delay
        let later = now + Duration::milliseconds(500);
        exercise.select_source(source, later);
        exercise.select_target(target_index(&exercise, "4"), later);

        // first revert comes due but the item carries a newer flash
        exercise.process_due_reverts(now + Duration::milliseconds(1100));
        assert!(exercise.source_items()[source].is_invalid_flash());

        // the superseding revert clears it
        exercise.process_due_reverts(now + Duration::milliseconds(1600));
        assert!(!exercise.source_items()[source].is_invalid_flash());
    }

    #[test]
    fn new_selection_replaces_prior_in_same_column() {
        let now = fixed_now();
        let mut exercise = MatchingExercise::new(&five_pairs(), Mode::Practice);

        exercise.select_source(source_index(&exercise, "a"), now);
        exercise.select_source(source_index(&exercise, "b"), now);
        exercise.select_target(target_index(&exercise, "2"), now);

        let source = source_index(&exercise, "b");
        assert!(exercise.source_items()[source].is_matched());
        assert_eq!(exercise.correctly_matched(), 1);
    }

    #[test]
    fn practice_completes_when_all_pairs_matched() {
        let now = fixed_now();
        let pairs = vec![MatchingPair::new("a", "1"), MatchingPair::new("b", "2")];
        let mut exercise = MatchingExercise::new(&pairs, Mode::Practice);

        for source_text in ["a", "b"] {
            let source = source_index(&exercise, source_text);
            let id = exercise.source_items()[source].id();
            let target = exercise
                .target_items()
                .iter()
                .position(|item| item.id() == id)
                .unwrap();
            exercise.select_source(source, now);
            exercise.select_target(target, now);
        }

        let result = exercise.result();
        assert!(result.completed);
        assert!(result.correct);
    }

    #[test]
    fn test_mode_miss_is_permanent_and_counted() {
        let now = fixed_now();
        let pairs = vec![MatchingPair::new("a", "1"), MatchingPair::new("b", "2")];
        let mut exercise = MatchingExercise::new(&pairs, Mode::Test);

        let source = source_index(&exercise, "a");
        let target = target_index(&exercise, "2");
        exercise.select_source(source, now);
        exercise.select_target(target, now);

        assert_eq!(exercise.incorrectly_matched(), 1);
        exercise.process_due_reverts(now + Duration::seconds(10));
        assert!(exercise.source_items()[source].is_invalid_flash());
    }

    #[test]
    fn test_mode_completes_on_mixed_outcomes_as_incorrect() {
        let now = fixed_now();
        let pairs = vec![
            MatchingPair::new("a", "1"),
            MatchingPair::new("b", "2"),
            MatchingPair::new("c", "3"),
        ];
        let mut exercise = MatchingExercise::new(&pairs, Mode::Test);

        // one correct pair
        exercise.select_source(source_index(&exercise, "a"), now);
        exercise.select_target(target_index(&exercise, "1"), now);
        assert!(!exercise.result().completed);

        // two misses exhaust the remaining pairs
        exercise.select_source(source_index(&exercise, "b"), now);
        exercise.select_target(target_index(&exercise, "3"), now);
        assert!(!exercise.result().completed);

        exercise.select_source(source_index(&exercise, "c"), now);
        exercise.select_target(target_index(&exercise, "2"), now);

        let result = exercise.result();
        assert!(result.completed);
        assert!(!result.correct);
        assert_eq!(exercise.correctly_matched(), 1);
        assert_eq!(exercise.incorrectly_matched(), 2);
    }

    #[test]
    fn completed_exercise_ignores_further_selections() {
        let now = fixed_now();
        let pairs = vec![MatchingPair::new("a", "1")];
        let mut exercise = MatchingExercise::new(&pairs, Mode::Practice);

        exercise.select_source(0, now);
        exercise.select_target(0, now);
        assert!(exercise.result().completed);

        exercise.select_source(0, now);
        exercise.select_target(0, now);
        assert_eq!(exercise.correctly_matched(), 1);
    }
}
