use crate::model::answers::AnswerSheet;
use crate::model::question::QuestionSet;

/// Final result of an exam: correct selections out of total questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

/// Scores a sheet against a question set.
///
/// Position `i` counts iff the recorded letter equals the question's answer
/// letter; unanswered positions never count. Pure and deterministic.
#[must_use]
pub fn score(questions: &QuestionSet, answers: &AnswerSheet) -> Score {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(position, question)| answers.selected(*position) == Some(question.answer()))
        .count();

    Score {
        correct,
        total: questions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{Choice, OptionLetter, Question};

    fn letter(s: &str) -> OptionLetter {
        OptionLetter::new(s).unwrap()
    }

    fn build_question(answer: &str) -> Question {
        let choices = vec![
            Choice::parse("A. first").unwrap(),
            Choice::parse("B. second").unwrap(),
            Choice::parse("C. third").unwrap(),
        ];
        Question::new("Pick one", choices, letter(answer)).unwrap()
    }

    #[test]
    fn counts_only_matching_selections() {
        let questions = QuestionSet::new(vec![
            build_question("A"),
            build_question("B"),
            build_question("C"),
        ]);
        let mut answers = AnswerSheet::new(3);
        answers.select(0, letter("A")).unwrap();
        answers.select(1, letter("C")).unwrap();
        // position 2 left unanswered

        let result = score(&questions, &answers);
        assert_eq!(result, Score { correct: 1, total: 3 });
    }

    #[test]
    fn empty_set_scores_zero_of_zero() {
        let result = score(&QuestionSet::empty(), &AnswerSheet::new(0));
        assert_eq!(result, Score { correct: 0, total: 0 });
    }

    #[test]
    fn correct_count_is_bounded_by_total() {
        let questions = QuestionSet::new(vec![build_question("B"), build_question("B")]);
        let mut answers = AnswerSheet::new(2);
        answers.select(0, letter("B")).unwrap();
        answers.select(1, letter("B")).unwrap();

        let result = score(&questions, &answers);
        assert_eq!(result.total, 2);
        assert!(result.correct <= result.total);
        assert_eq!(result.correct, 2);
    }
}
