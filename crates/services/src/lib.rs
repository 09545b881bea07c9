#![forbid(unsafe_code)]

pub mod error;
pub mod exams;
pub mod question_bank;

pub use exam_core::Clock;

pub use error::{ExamError, QuestionBankError};
pub use exams::{
    DEFAULT_DURATION_SECONDS, ExamProgress, ExamService, ExamSnapshot, ExamTimer, NavigatorItem,
    QuestionView, RunningExam, format_remaining,
};
pub use question_bank::{
    HttpQuestionBank, QuestionBankConfig, QuestionRecord, QuestionSource, StaticQuestionBank,
    load_question_set,
};
