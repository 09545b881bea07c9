use std::fmt;
use std::sync::{Arc, Mutex};

use exam_core::model::{OptionLetter, Score};
use exam_core::{Clock, ExamSession, Phase};

use super::progress::ExamProgress;
use super::timer::ExamTimer;
use super::view::ExamSnapshot;
use crate::error::ExamError;
use crate::question_bank::{QuestionSource, load_question_set};

/// Default session length, matching the collaborating exam frontend.
pub const DEFAULT_DURATION_SECONDS: u32 = 3600;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Builds running exams from a question source.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    duration_seconds: u32,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }

    #[must_use]
    pub fn with_duration_seconds(mut self, duration_seconds: u32) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Loads questions and starts a ticking exam.
    ///
    /// Load failures degrade to an empty exam rather than failing the start;
    /// the countdown is armed only here, after the load has resolved.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` if the fresh session refuses activation.
    pub async fn start_exam(&self) -> Result<RunningExam, ExamError> {
        let questions = load_question_set(self.source.as_ref()).await;
        tracing::info!(count = questions.len(), "starting exam session");

        let mut session = ExamSession::new(self.duration_seconds);
        session.activate(questions, self.clock.now())?;

        let session = Arc::new(Mutex::new(session));
        let timer = ExamTimer::spawn(Arc::clone(&session), self.clock);
        Ok(RunningExam {
            clock: self.clock,
            session,
            timer,
        })
    }
}

impl fmt::Debug for ExamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamService")
            .field("clock", &self.clock)
            .field("duration_seconds", &self.duration_seconds)
            .finish_non_exhaustive()
    }
}

//
// ─── RUNNING EXAM ──────────────────────────────────────────────────────────────
//

/// A live exam: the shared session plus its ticking timer.
///
/// The mutating calls and the read-only snapshot each lock the session,
/// apply one event, and release; the timer task does the same, so every
/// mutation is serialized without further synchronization.
#[derive(Debug)]
pub struct RunningExam {
    clock: Clock,
    session: Arc<Mutex<ExamSession>>,
    timer: ExamTimer,
}

impl RunningExam {
    fn with_session<T>(&self, f: impl FnOnce(&mut ExamSession) -> T) -> Result<T, ExamError> {
        let mut guard = self.session.lock().map_err(|_| ExamError::Poisoned)?;
        Ok(f(&mut guard))
    }

    /// Records an answer for the currently displayed question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` for phase violations, unknown letters,
    /// or the no-questions exam.
    pub fn select_answer(&self, letter: OptionLetter) -> Result<(), ExamError> {
        self.with_session(|session| session.select_answer(letter))?
            .map_err(ExamError::from)
    }

    /// Jumps to a question by zero-based position.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` for out-of-range positions or phase
    /// violations.
    pub fn jump(&self, position: usize) -> Result<(), ExamError> {
        self.with_session(|session| session.jump(position))?
            .map_err(ExamError::from)
    }

    /// Advances to the next question; clamps at the last position.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn next(&self) -> Result<(), ExamError> {
        self.with_session(ExamSession::next)
    }

    /// Steps back to the previous question; clamps at position 0.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn prev(&self) -> Result<(), ExamError> {
        self.with_session(ExamSession::prev)
    }

    /// Submits the exam now and stops the timer. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` only while questions are still loading.
    pub fn submit(&self) -> Result<Score, ExamError> {
        let now = self.clock.now();
        let result = self.with_session(|session| session.submit(now))??;
        // the session has already cancelled its countdown; this just reaps
        // the ticking task
        self.timer.cancel();
        Ok(result)
    }

    /// Read-only projection of the session for rendering.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn snapshot(&self) -> Result<ExamSnapshot, ExamError> {
        self.with_session(|session| ExamSnapshot::capture(session))
    }

    /// Aggregated progress counters.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn progress(&self) -> Result<ExamProgress, ExamError> {
        self.with_session(|session| ExamProgress::capture(session))
    }

    /// Current lifecycle phase.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn phase(&self) -> Result<Phase, ExamError> {
        self.with_session(|session| session.phase())
    }

    /// Final score; `None` until submitted.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Poisoned` only if the session lock is poisoned.
    pub fn result(&self) -> Result<Option<Score>, ExamError> {
        self.with_session(|session| session.result())
    }

    /// True once the ticking task has exited.
    #[must_use]
    pub fn timer_finished(&self) -> bool {
        self.timer.is_finished()
    }
}
