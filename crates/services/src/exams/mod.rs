mod progress;
mod service;
mod timer;
mod view;

// Public API of the exam subsystem.
pub use progress::ExamProgress;
pub use service::{DEFAULT_DURATION_SECONDS, ExamService, RunningExam};
pub use timer::ExamTimer;
pub use view::{ChoiceView, ExamSnapshot, NavigatorItem, QuestionView, format_remaining};
