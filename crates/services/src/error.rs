//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::QuestionError;
use exam_core::session::SessionError;

/// Errors emitted by question-bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Errors emitted by the exam service facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam session lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Session(#[from] SessionError),
}
