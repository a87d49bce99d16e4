use serde::{Deserialize, Serialize};

use crate::model::content::{FillBlankPayload, ImageChoicePayload, MatchingPair};
use crate::model::ids::TaskId;

/// Type tag for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    MatchTerms,
    FillInBlank,
    ImageChoice,
}

/// Content handed to an exercise, one variant per exercise kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPayload {
    Matching(Vec<MatchingPair>),
    FillBlank(FillBlankPayload),
    ImageChoice(Vec<ImageChoicePayload>),
}

impl TaskPayload {
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskPayload::Matching(_) => TaskKind::MatchTerms,
            TaskPayload::FillBlank(_) => TaskKind::FillInBlank,
            TaskPayload::ImageChoice(_) => TaskKind::ImageChoice,
        }
    }
}

/// A scheduled unit of exercise work.
///
/// Immutable once created; the session controller owns tasks for the
/// lifetime of a session and exercises only read the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    topic: String,
    payload: TaskPayload,
}

impl Task {
    /// Creates a task with a freshly drawn random id.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: TaskPayload) -> Self {
        Self {
            id: TaskId::random(),
            topic: topic.into(),
            payload,
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.payload.kind()
    }

    #[must_use]
    pub fn payload(&self) -> &TaskPayload {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_payload() {
        let task = Task::new(
            "family_match",
            TaskPayload::Matching(vec![MatchingPair::new("ana", "mother")]),
        );
        assert_eq!(task.kind(), TaskKind::MatchTerms);
        assert_eq!(task.topic(), "family_match");
    }

    #[test]
    fn tasks_get_distinct_ids() {
        let a = Task::new("t", TaskPayload::ImageChoice(Vec::new()));
        let b = Task::new("t", TaskPayload::ImageChoice(Vec::new()));
        assert_ne!(a.id(), b.id());
    }
}
