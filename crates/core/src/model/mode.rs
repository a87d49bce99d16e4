use serde::{Deserialize, Serialize};

/// Behavioral switch consulted by every exercise.
///
/// `Practice` keeps an exercise open after a wrong answer and reverts the
/// incorrect feedback after a short delay. `Test` treats the first answer
/// as final and locks in misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Practice,
    Test,
}

impl Mode {
    #[must_use]
    pub fn is_test(&self) -> bool {
        matches!(self, Mode::Test)
    }
}
