mod answers;
mod question;
mod score;
mod visited;

pub use answers::{AnswerError, AnswerSheet};
pub use question::{Choice, OptionLetter, Question, QuestionError, QuestionSet};
pub use score::{Score, score};
pub use visited::VisitedSet;
