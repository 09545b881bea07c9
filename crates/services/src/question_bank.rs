use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use exam_core::model::{Choice, OptionLetter, Question, QuestionError, QuestionSet};

use crate::error::QuestionBankError;

/// Wire shape of one question-bank element.
///
/// Options arrive as display labels (`"A. Paris"`); `answer` is the bare
/// correct letter.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionRecord {
    /// Converts the record into a validated domain question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when a label is malformed or the record
    /// violates a question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let choices = self
            .options
            .iter()
            .map(|label| Choice::parse(label))
            .collect::<Result<Vec<_>, _>>()?;
        Question::new(self.question, choices, OptionLetter::new(self.answer)?)
    }
}

/// Contract for the question-bank collaborator.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches the raw question payload.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` on transport or status failures.
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, QuestionBankError>;
}

//
// ─── HTTP SOURCE ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct QuestionBankConfig {
    pub base_url: String,
    pub topic: Option<String>,
}

impl QuestionBankConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            topic: None,
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("EXAM_BANK_URL").unwrap_or_else(|_| "http://localhost:5001".into());
        let topic = env::var("EXAM_BANK_TOPIC").ok().filter(|t| !t.trim().is_empty());
        Self { base_url, topic }
    }
}

/// Question bank reached over HTTP (`GET <base>/generate-mcqs[?topic=..]`).
#[derive(Clone)]
pub struct HttpQuestionBank {
    client: Client,
    config: QuestionBankConfig,
}

impl HttpQuestionBank {
    #[must_use]
    pub fn new(config: QuestionBankConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuestionBankConfig::from_env())
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionBank {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, QuestionBankError> {
        let url = format!(
            "{}/generate-mcqs",
            self.config.base_url.trim_end_matches('/')
        );
        let mut request = self.client.get(url);
        if let Some(topic) = &self.config.topic {
            request = request.query(&[("topic", topic)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(QuestionBankError::HttpStatus(response.status()));
        }

        // A non-array body (the bank reports generation errors as an object)
        // fails decoding and is treated as zero questions by the loader.
        let records: Vec<QuestionRecord> = response.json().await?;
        Ok(records)
    }
}

//
// ─── STATIC SOURCE ─────────────────────────────────────────────────────────────
//

/// In-memory source for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionBank {
    records: Vec<QuestionRecord>,
}

impl StaticQuestionBank {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionBank {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, QuestionBankError> {
        Ok(self.records.clone())
    }
}

//
// ─── LOADER ────────────────────────────────────────────────────────────────────
//

/// Loads the question set, degrading every failure to an empty set.
///
/// A single failed load is terminal for the session instance; no retries.
/// One malformed record poisons the whole payload, matching the treatment of
/// a malformed response body.
pub async fn load_question_set(source: &dyn QuestionSource) -> QuestionSet {
    match try_load(source).await {
        Ok(questions) => questions,
        Err(err) => {
            tracing::warn!("question bank load failed, starting with no questions: {err}");
            QuestionSet::empty()
        }
    }
}

async fn try_load(source: &dyn QuestionSource) -> Result<QuestionSet, QuestionBankError> {
    let records = source.fetch().await?;
    let questions = records
        .into_iter()
        .map(|record| record.into_question().map_err(QuestionBankError::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QuestionSet::new(questions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, options: &[&str], answer: &str) -> QuestionRecord {
        QuestionRecord {
            question: question.to_owned(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            answer: answer.to_owned(),
        }
    }

    #[test]
    fn record_converts_to_domain_question() {
        let question = record("Capital of Spain?", &["A. Paris", "B. Madrid"], "B")
            .into_question()
            .unwrap();
        assert_eq!(question.prompt(), "Capital of Spain?");
        assert_eq!(question.choices().len(), 2);
        assert_eq!(question.answer().as_str(), "B");
    }

    #[test]
    fn record_with_unlabeled_option_is_rejected() {
        let err = record("Q", &["Madrid"], "A").into_question().unwrap_err();
        assert!(matches!(err, QuestionError::MalformedLabel { .. }));
    }

    #[tokio::test]
    async fn static_bank_round_trips_records() {
        let bank = StaticQuestionBank::new(vec![record("Q", &["A. yes", "B. no"], "A")]);
        let set = load_question_set(&bank).await;
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn malformed_record_degrades_whole_payload() {
        let bank = StaticQuestionBank::new(vec![
            record("Q1", &["A. yes", "B. no"], "A"),
            record("Q2", &["no label"], "A"),
        ]);
        let set = load_question_set(&bank).await;
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn failing_source_degrades_to_empty() {
        struct FailingBank;

        #[async_trait]
        impl QuestionSource for FailingBank {
            async fn fetch(&self) -> Result<Vec<QuestionRecord>, QuestionBankError> {
                Err(QuestionBankError::HttpStatus(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ))
            }
        }

        let set = load_question_set(&FailingBank).await;
        assert!(set.is_empty());
    }
}
