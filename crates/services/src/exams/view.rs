use exam_core::model::Score;
use exam_core::{ExamSession, Phase};

/// Formats remaining seconds as `mm:ss` for the header clock.
///
/// Minutes run past 59 for long sessions (`"60:00"` for a full hour).
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One selectable choice of the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub letter: String,
    /// Full display label (`"A. Paris"`).
    pub label: String,
    pub selected: bool,
}

/// The current question as the candidate sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based display number.
    pub number: usize,
    pub prompt: String,
    pub choices: Vec<ChoiceView>,
}

/// Navigator grid state for one position: unvisited, visited-but-unanswered,
/// or answered, plus the current-question marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorItem {
    pub position: usize,
    /// 1-based display number.
    pub number: usize,
    pub visited: bool,
    pub answered: bool,
    pub current: bool,
}

/// Read-only projection of a session for rendering.
///
/// Presentation-agnostic apart from the `mm:ss` clock string, which is part
/// of the exam's stated display contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSnapshot {
    pub phase: Phase,
    pub time_left: String,
    pub remaining_seconds: u32,
    pub question_count: usize,
    /// `None` when the exam has no questions.
    pub current: Option<QuestionView>,
    pub navigator: Vec<NavigatorItem>,
    pub result: Option<Score>,
}

impl ExamSnapshot {
    #[must_use]
    pub fn capture(session: &ExamSession) -> Self {
        let position = session.current_position();
        let current = session.current_question().map(|question| {
            let selected = session.answer(position);
            QuestionView {
                number: position + 1,
                prompt: question.prompt().to_owned(),
                choices: question
                    .choices()
                    .iter()
                    .map(|choice| ChoiceView {
                        letter: choice.letter().to_string(),
                        label: choice.label(),
                        selected: Some(choice.letter()) == selected,
                    })
                    .collect(),
            }
        });

        let navigator = (0..session.question_count())
            .map(|p| NavigatorItem {
                position: p,
                number: p + 1,
                visited: session.is_visited(p),
                answered: session.is_answered(p),
                current: p == position,
            })
            .collect();

        Self {
            phase: session.phase(),
            time_left: format_remaining(session.remaining_seconds()),
            remaining_seconds: session.remaining_seconds(),
            question_count: session.question_count(),
            current,
            navigator,
            result: session.result(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Choice, OptionLetter, Question, QuestionSet};
    use exam_core::time::fixed_now;

    fn letter(s: &str) -> OptionLetter {
        OptionLetter::new(s).unwrap()
    }

    fn two_questions() -> QuestionSet {
        let build = |prompt: &str| {
            Question::new(
                prompt,
                vec![
                    Choice::parse("A. yes").unwrap(),
                    Choice::parse("B. no").unwrap(),
                ],
                letter("A"),
            )
            .unwrap()
        };
        QuestionSet::new(vec![build("Q1"), build("Q2")])
    }

    fn active_session() -> ExamSession {
        let mut session = ExamSession::new(3600);
        session.activate(two_questions(), fixed_now()).unwrap();
        session
    }

    #[test]
    fn formats_full_hour_and_edges() {
        assert_eq!(format_remaining(3600), "60:00");
        assert_eq!(format_remaining(3599), "59:59");
        assert_eq!(format_remaining(65), "01:05");
        assert_eq!(format_remaining(0), "00:00");
    }

    #[test]
    fn snapshot_reflects_selection_and_navigation() {
        let mut session = active_session();
        session.select_answer(letter("B")).unwrap();

        let snapshot = ExamSnapshot::capture(&session);
        let current = snapshot.current.unwrap();
        assert_eq!(current.number, 1);
        assert_eq!(current.prompt, "Q1");
        assert!(!current.choices[0].selected);
        assert!(current.choices[1].selected);
        assert_eq!(current.choices[1].label, "B. no");
        assert_eq!(snapshot.time_left, "60:00");

        let nav = &snapshot.navigator;
        assert_eq!(nav.len(), 2);
        assert!(nav[0].visited && nav[0].answered && nav[0].current);
        assert!(!nav[1].visited && !nav[1].answered && !nav[1].current);
    }

    #[test]
    fn snapshot_of_empty_exam_has_no_current_question() {
        let mut session = ExamSession::new(3600);
        session.activate(QuestionSet::empty(), fixed_now()).unwrap();

        let snapshot = ExamSnapshot::capture(&session);
        assert!(snapshot.current.is_none());
        assert!(snapshot.navigator.is_empty());
        assert_eq!(snapshot.question_count, 0);
    }

    #[test]
    fn snapshot_carries_result_after_submission() {
        let mut session = active_session();
        session.submit(fixed_now()).unwrap();

        let snapshot = ExamSnapshot::capture(&session);
        assert_eq!(snapshot.phase, Phase::Submitted);
        assert_eq!(snapshot.result.map(|r| r.total), Some(2));
    }
}
