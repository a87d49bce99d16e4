mod practice;

pub use final_test::{FinalTestOutcome, FinalTestRun, FinalTestService};
pub use practice::PracticeService;
