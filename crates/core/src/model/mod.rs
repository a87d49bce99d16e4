mod content;
mod ids;
mod mode;
mod task;
mod topic;

pub use content::{ContentError, FillBlankPayload, ImageChoicePayload, MatchingPair, BLANK_MARKER};
pub use ids::{TaskId, UserId};
pub use mode::Mode;
pub use task::{Task, TaskKind, TaskPayload};
pub use topic::{ParseTopicError, Topic};
