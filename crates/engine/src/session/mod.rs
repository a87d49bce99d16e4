mod controller;
mod progress;

// Public API of the session subsystem.
pub use controller::{SessionController, SessionPhase};
pub use progress::SessionProgress;
