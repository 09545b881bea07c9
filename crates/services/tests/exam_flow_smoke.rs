use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use exam_core::Phase;
use exam_core::model::OptionLetter;
use exam_core::time::fixed_clock;
use services::{
    ExamService, QuestionBankError, QuestionRecord, QuestionSource, StaticQuestionBank,
};

fn letter(s: &str) -> OptionLetter {
    OptionLetter::new(s).unwrap()
}

fn record(question: &str, answer: &str) -> QuestionRecord {
    QuestionRecord {
        question: question.to_owned(),
        options: vec![
            "A. first".to_owned(),
            "B. second".to_owned(),
            "C. third".to_owned(),
        ],
        answer: answer.to_owned(),
    }
}

fn three_question_bank() -> StaticQuestionBank {
    StaticQuestionBank::new(vec![
        record("Q1", "A"),
        record("Q2", "B"),
        record("Q3", "C"),
    ])
}

struct FailingBank;

#[async_trait]
impl QuestionSource for FailingBank {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, QuestionBankError> {
        Err(QuestionBankError::HttpStatus(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
        ))
    }
}

#[tokio::test]
async fn full_flow_answers_navigates_and_scores() {
    let service = ExamService::new(fixed_clock(), Arc::new(three_question_bank()));
    let exam = service.start_exam().await.unwrap();

    let snapshot = exam.snapshot().unwrap();
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.question_count, 3);
    assert_eq!(snapshot.time_left, "60:00");

    exam.select_answer(letter("A")).unwrap(); // correct
    exam.next().unwrap();
    exam.select_answer(letter("C")).unwrap(); // wrong
    exam.jump(2).unwrap();
    // leave Q3 unanswered, go back and check the recorded answer survived
    exam.prev().unwrap();
    let snapshot = exam.snapshot().unwrap();
    let current = snapshot.current.unwrap();
    assert_eq!(current.number, 2);
    assert!(current.choices.iter().any(|c| c.letter == "C" && c.selected));

    let progress = exam.progress().unwrap();
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.visited, 3);

    let result = exam.submit().unwrap();
    assert_eq!(result.correct, 1);
    assert_eq!(result.total, 3);

    // idempotent: a second submit returns the same score
    let again = exam.submit().unwrap();
    assert_eq!(again, result);
    assert_eq!(exam.phase().unwrap(), Phase::Submitted);
}

#[tokio::test]
async fn failed_load_degrades_to_empty_active_exam() {
    let service = ExamService::new(fixed_clock(), Arc::new(FailingBank));
    let exam = service.start_exam().await.unwrap();

    assert_eq!(exam.phase().unwrap(), Phase::Active);
    let snapshot = exam.snapshot().unwrap();
    assert_eq!(snapshot.question_count, 0);
    assert!(snapshot.current.is_none());

    assert!(exam.jump(0).is_err());
    assert!(exam.select_answer(letter("A")).is_err());

    let result = exam.submit().unwrap();
    assert_eq!(result.correct, 0);
    assert_eq!(result.total, 0);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_auto_submits_recorded_answers() {
    let service = ExamService::new(fixed_clock(), Arc::new(three_question_bank()))
        .with_duration_seconds(3);
    let exam = service.start_exam().await.unwrap();
    exam.select_answer(letter("A")).unwrap();

    // paused time auto-advances through the ticker's one-second interval
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(exam.phase().unwrap(), Phase::Submitted);
    let result = exam.result().unwrap().unwrap();
    assert_eq!(result.correct, 1);
    assert_eq!(result.total, 3);
    assert!(exam.timer_finished());
}

#[tokio::test(start_paused = true)]
async fn manual_submit_stops_the_ticker() {
    let service = ExamService::new(fixed_clock(), Arc::new(three_question_bank()));
    let exam = service.start_exam().await.unwrap();

    let result = exam.submit().unwrap();
    assert_eq!(result.total, 3);

    // ticks racing the submission find the countdown dormant
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(exam.phase().unwrap(), Phase::Submitted);
    assert_eq!(exam.snapshot().unwrap().remaining_seconds, 3600);
}
