pub mod attempt_state;
pub mod course_page;
pub mod course_view;
pub mod module_ctx;
pub mod module_runner;

pub use attempt_state::{AttemptStats, Judged, ModuleAttemptState};
pub use course_page::CoursePage;
pub use course_view::{CourseView, ModuleEntry};
pub use module_ctx::ModuleCtx;
pub use module_runner::{ModuleOutcome, ModuleReport, ModuleRunner, QuestionOutcome, RunnerState};
