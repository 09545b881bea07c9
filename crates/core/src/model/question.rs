use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── OPTION LETTER ─────────────────────────────────────────────────────────────
//

/// Letter label identifying one choice within a question (`"A"`, `"B"`, …).
///
/// Letters are compared exactly as the question bank emits them; surrounding
/// whitespace is trimmed at construction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionLetter(String);

impl OptionLetter {
    /// Creates a letter label from a raw string.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyLetter` if the trimmed input is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, QuestionError> {
        let letter = raw.into().trim().to_owned();
        if letter.is_empty() {
            return Err(QuestionError::EmptyLetter);
        }
        Ok(Self(letter))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionLetter({})", self.0)
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── CHOICE ────────────────────────────────────────────────────────────────────
//

/// A single answer option, split into its letter label and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    letter: OptionLetter,
    text: String,
}

impl Choice {
    /// Parses a wire-format option label of the form `"<letter>. <text>"`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MalformedLabel` when the label has no `.`
    /// separator, and `QuestionError::EmptyLetter` when nothing precedes it.
    pub fn parse(label: &str) -> Result<Self, QuestionError> {
        let (letter, text) = label
            .split_once('.')
            .ok_or_else(|| QuestionError::MalformedLabel {
                label: label.to_owned(),
            })?;
        Ok(Self {
            letter: OptionLetter::new(letter)?,
            text: text.trim().to_owned(),
        })
    }

    #[must_use]
    pub fn letter(&self) -> &OptionLetter {
        &self.letter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reassembles the display label (`"A. Paris"`).
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}. {}", self.letter, self.text)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: Vec<Choice>,
    answer: OptionLetter,
}

impl Question {
    /// Builds a question, enforcing the construction invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::DuplicateLetter` when two choices share a letter, and
    /// `QuestionError::UnknownAnswer` when `answer` names none of the choices.
    pub fn new(
        prompt: impl Into<String>,
        choices: Vec<Choice>,
        answer: OptionLetter,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        for (i, choice) in choices.iter().enumerate() {
            if choices[..i].iter().any(|c| c.letter == choice.letter) {
                return Err(QuestionError::DuplicateLetter {
                    letter: choice.letter.clone(),
                });
            }
        }

        if !choices.iter().any(|c| c.letter == answer) {
            return Err(QuestionError::UnknownAnswer { letter: answer });
        }

        Ok(Self {
            prompt,
            choices,
            answer,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn answer(&self) -> &OptionLetter {
        &self.answer
    }

    /// Returns true when `letter` labels one of this question's choices.
    #[must_use]
    pub fn offers(&self, letter: &OptionLetter) -> bool {
        self.choices.iter().any(|c| &c.letter == letter)
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Immutable ordered sequence of questions; positions are the indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The degraded no-questions set used when loading fails.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("option letter is empty")]
    EmptyLetter,

    #[error("option label {label:?} is not of the form \"<letter>. <text>\"")]
    MalformedLabel { label: String },

    #[error("duplicate option letter {letter}")]
    DuplicateLetter { letter: OptionLetter },

    #[error("answer letter {letter} does not label any option")]
    UnknownAnswer { letter: OptionLetter },
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
