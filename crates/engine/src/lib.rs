#![forbid(unsafe_code)]

pub mod error;
pub mod exercises;
pub mod factory;
pub mod notify;
pub mod session;
pub mod workflow;

pub use lingo_core::Clock;

pub use error::{PoolError, PracticeError};
pub use exercises::{Exercise, ExerciseResult, Validation};
pub use factory::{PoolConfig, TaskFactory};
pub use notify::{Notifier, NotifyError, NullNotifier};
pub use session::{SessionController, SessionPhase, SessionProgress};
pub use workflow::{FinalTestOutcome, FinalTestRun, FinalTestService, PracticeService};
