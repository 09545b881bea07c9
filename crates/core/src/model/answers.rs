use thiserror::Error;

use crate::model::question::OptionLetter;

/// Per-position record of the candidate's selections.
///
/// Every position starts unanswered; re-selecting a position overwrites the
/// earlier letter (last write wins, no history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    selected: Vec<Option<OptionLetter>>,
}

impl AnswerSheet {
    /// Creates a sheet with `len` unanswered positions.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            selected: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Records `letter` for `position`, replacing any prior selection.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::OutOfRange` when `position` is not a valid index.
    pub fn select(&mut self, position: usize, letter: OptionLetter) -> Result<(), AnswerError> {
        let len = self.selected.len();
        let slot = self
            .selected
            .get_mut(position)
            .ok_or(AnswerError::OutOfRange { position, len })?;
        *slot = Some(letter);
        Ok(())
    }

    #[must_use]
    pub fn selected(&self, position: usize) -> Option<&OptionLetter> {
        self.selected.get(position).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_answered(&self, position: usize) -> bool {
        self.selected(position).is_some()
    }

    /// Number of positions with a recorded selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selected.iter().filter(|s| s.is_some()).count()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("position {position} out of range for {len} questions")]
    OutOfRange { position: usize, len: usize },
}
