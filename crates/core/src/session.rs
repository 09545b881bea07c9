use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::countdown::{Countdown, Tick};
use crate::model::{
    AnswerError, AnswerSheet, OptionLetter, Question, QuestionSet, Score, VisitedSet, score,
};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle stage of an exam session.
///
/// Transitions are monotonic: `Loading → Active → Submitted`, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Submitted,
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors emitted by session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("questions are still loading")]
    Loading,

    #[error("exam already active")]
    AlreadyActive,

    #[error("exam already submitted")]
    Submitted,

    #[error("position {position} out of range for {len} questions")]
    OutOfRange { position: usize, len: usize },

    #[error("option {letter} is not offered by the current question")]
    InvalidOption { letter: OptionLetter },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory exam session over a fixed question set.
///
/// Owns every piece of mutable session state (answer sheet, visited set,
/// countdown, current position, phase); all mutation goes through the methods
/// below, one event at a time. `submit` is the single authoritative exit from
/// `Active` — both the candidate's submit action and countdown expiry land
/// there, and its idempotence is what makes a simultaneous pair of those
/// events submit exactly once.
pub struct ExamSession {
    duration_seconds: u32,
    questions: QuestionSet,
    answers: AnswerSheet,
    visited: VisitedSet,
    countdown: Countdown,
    current: usize,
    phase: Phase,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    result: Option<Score>,
}

impl ExamSession {
    /// Creates a session waiting on its question load.
    ///
    /// Every operation except [`ExamSession::activate`] is rejected while
    /// loading; the countdown is not armed until activation, so a failed or
    /// slow load never costs the candidate time.
    #[must_use]
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            questions: QuestionSet::empty(),
            answers: AnswerSheet::new(0),
            visited: VisitedSet::new(0),
            countdown: Countdown::new(duration_seconds),
            current: 0,
            phase: Phase::Loading,
            started_at: None,
            submitted_at: None,
            result: None,
        }
    }

    /// Completes loading and enters `Active`.
    ///
    /// An empty `questions` set is a valid activation (the degraded
    /// no-questions session); position 0 is marked visited when it exists.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyActive` or `SessionError::Submitted`
    /// when the session has left `Loading`.
    pub fn activate(
        &mut self,
        questions: QuestionSet,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        match self.phase {
            Phase::Loading => {}
            Phase::Active => return Err(SessionError::AlreadyActive),
            Phase::Submitted => return Err(SessionError::Submitted),
        }

        let len = questions.len();
        self.answers = AnswerSheet::new(len);
        self.visited = VisitedSet::new(len);
        self.questions = questions;
        self.countdown = Countdown::new(self.duration_seconds);
        self.current = 0;
        self.visited.mark(0);
        self.started_at = Some(now);
        self.phase = Phase::Active;
        Ok(())
    }

    /// Records `letter` as the answer to the current question.
    ///
    /// A later selection overwrites an earlier one for the same position.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Loading` / `SessionError::Submitted` outside
    /// `Active`, `SessionError::OutOfRange` when there is no current question
    /// (empty set), and `SessionError::InvalidOption` when `letter` labels
    /// none of the current question's choices.
    pub fn select_answer(&mut self, letter: OptionLetter) -> Result<(), SessionError> {
        self.require_active()?;

        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::OutOfRange {
                position: self.current,
                len: self.questions.len(),
            });
        };
        if !question.offers(&letter) {
            return Err(SessionError::InvalidOption { letter });
        }

        self.answers.select(self.current, letter).map_err(|err| {
            let AnswerError::OutOfRange { position, len } = err;
            SessionError::OutOfRange { position, len }
        })
    }

    /// Jumps to `position` and marks it visited.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` for invalid positions and the
    /// phase errors outside `Active`.
    pub fn jump(&mut self, position: usize) -> Result<(), SessionError> {
        self.require_active()?;

        if position >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                position,
                len: self.questions.len(),
            });
        }
        self.current = position;
        self.visited.mark(position);
        Ok(())
    }

    /// Advances to the next question; silently clamps at the last position.
    pub fn next(&mut self) {
        if self.phase == Phase::Active && self.current + 1 < self.questions.len() {
            self.current += 1;
            self.visited.mark(self.current);
        }
    }

    /// Steps back to the previous question; silently clamps at position 0.
    pub fn prev(&mut self) {
        if self.phase == Phase::Active && self.current > 0 {
            self.current -= 1;
            self.visited.mark(self.current);
        }
    }

    /// Delivers one one-second tick to the session.
    ///
    /// On expiry the session submits itself with whatever answers are
    /// recorded at that instant. Ticks outside `Active` are dormant.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        if self.phase != Phase::Active {
            return Tick::Dormant;
        }

        let outcome = self.countdown.tick();
        if outcome == Tick::Expired {
            // Expiry can only happen while Active, where submit cannot fail.
            let _ = self.submit(now);
        }
        outcome
    }

    /// Submits the exam and returns the score. Idempotent.
    ///
    /// The countdown is cancelled before the phase changes, so no tick can
    /// observe `Submitted` and still attempt mutation. A repeat call returns
    /// the cached score and mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Loading` when questions have not arrived yet.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<Score, SessionError> {
        match self.phase {
            Phase::Loading => return Err(SessionError::Loading),
            Phase::Submitted => {
                // result is always set on the Active → Submitted edge
                return Ok(self.result.unwrap_or(Score {
                    correct: 0,
                    total: self.questions.len(),
                }));
            }
            Phase::Active => {}
        }

        self.countdown.cancel();
        let result = score(&self.questions, &self.answers);
        self.result = Some(result);
        self.submitted_at = Some(now);
        self.phase = Phase::Submitted;
        Ok(result)
    }

    fn require_active(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Loading => Err(SessionError::Loading),
            Phase::Submitted => Err(SessionError::Submitted),
        }
    }

    //
    // ─── READ SURFACE ──────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn current_position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining()
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn answer(&self, position: usize) -> Option<&OptionLetter> {
        self.answers.selected(position)
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.answers.is_answered(position)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.answered_count()
    }

    #[must_use]
    pub fn is_visited(&self, position: usize) -> bool {
        self.visited.contains(position)
    }

    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.count()
    }

    /// Final score; `None` until submitted.
    #[must_use]
    pub fn result(&self) -> Option<Score> {
        self.result
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == Phase::Submitted
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("remaining_seconds", &self.countdown.remaining())
            .field("started_at", &self.started_at)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
