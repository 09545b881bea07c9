use exam_core::ExamSession;

/// Aggregated view of exam progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub visited: usize,
    pub unanswered: usize,
    pub is_submitted: bool,
}

impl ExamProgress {
    #[must_use]
    pub fn capture(session: &ExamSession) -> Self {
        let total = session.question_count();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            visited: session.visited_count(),
            unanswered: total.saturating_sub(answered),
            is_submitted: session.is_submitted(),
        }
    }
}
