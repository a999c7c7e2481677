//! Session aggregation.
//!
//! A [`Session`] is one interview pass: a fixed question list plus the answers
//! and evaluations collected against it. The driver owns it explicitly; a
//! [`SessionSlot`] models the "no session yet" state and restarts.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::model::{Answer, Evaluation, Mode, Question};
use crate::scoring::Scorer;

/// Rejections from session operations. None of them mutate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The submitted answer was empty or whitespace-only.
    #[error("answer is empty; write an answer or skip the question")]
    EmptyAnswer,

    #[error("question index {index} out of range (session has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Answers must be written in order; `next` is the first unanswered index.
    #[error("question {index} cannot be answered before question {next}")]
    OutOfOrder { index: usize, next: usize },

    #[error("session is complete and read-only")]
    Finalized,

    #[error("session incomplete: {evaluated} of {total} questions evaluated")]
    Incomplete { evaluated: usize, total: usize },
}

/// Lifecycle of the driver's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Complete,
}

/// Parameters for starting an interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSetup {
    pub role: String,
    pub domain: String,
    pub mode: Mode,
    pub count: usize,
}

/// One interview attempt.
///
/// Invariant: `answers.len() == evaluations.len() <= questions.len()`, and
/// index `i` of each list refers to the same question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    role: String,
    domain: String,
    mode: Mode,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    evaluations: Vec<Evaluation>,
    current: usize,
}

impl Session {
    /// Start a session with questions drawn from `bank`.
    pub fn start<R: Rng + ?Sized>(bank: &QuestionBank, setup: &InterviewSetup, rng: &mut R) -> Self {
        let questions = bank.select(&setup.role, &setup.domain, setup.mode, setup.count, rng);
        Self::with_questions(&setup.role, &setup.domain, setup.mode, questions)
    }

    /// Start a session over an explicit question list.
    pub fn with_questions(role: &str, domain: &str, mode: Mode, questions: Vec<Question>) -> Self {
        tracing::info!(role, domain, %mode, questions = questions.len(), "session started");
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            role: role.to_string(),
            domain: domain.to_string(),
            mode,
            questions,
            answers: Vec::new(),
            evaluations: Vec::new(),
            current: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn evaluation(&self, index: usize) -> Option<&Evaluation> {
        self.evaluations.get(index)
    }

    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    /// Index of the question the driver should show.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Move the cursor to the next question without answering ("next question").
    pub fn advance(&mut self) {
        self.current = self.next_index(self.current);
    }

    /// Fraction of questions evaluated, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 1.0;
        }
        self.evaluations.len() as f64 / self.questions.len() as f64
    }

    /// True iff every question has an evaluation.
    pub fn is_complete(&self) -> bool {
        self.evaluations.len() == self.questions.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Complete
        } else {
            SessionPhase::InProgress
        }
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1).min(self.questions.len().saturating_sub(1))
    }

    fn check_writable(&self, index: usize) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Finalized);
        }
        if index >= self.questions.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        if index > self.evaluations.len() {
            return Err(SessionError::OutOfOrder {
                index,
                next: self.evaluations.len(),
            });
        }
        Ok(())
    }

    fn record(&mut self, index: usize, answer: Answer, evaluation: Evaluation) {
        if index < self.evaluations.len() {
            self.answers[index] = answer;
            self.evaluations[index] = evaluation;
        } else {
            self.answers.push(answer);
            self.evaluations.push(evaluation);
        }
        self.current = self.next_index(index);
    }

    /// Score and record an answer for question `index`.
    ///
    /// Resubmitting an index overwrites it. Empty or whitespace-only text is
    /// rejected and leaves the session untouched.
    pub async fn submit(
        &mut self,
        index: usize,
        answer_text: &str,
        scorer: &Scorer,
    ) -> Result<&Evaluation, SessionError> {
        self.check_writable(index)?;
        let text = answer_text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        let question = &self.questions[index];
        let evaluation = scorer.evaluate(&question.text, text, self.mode).await;
        tracing::debug!(index, score = evaluation.score, "answer evaluated");

        let answer = Answer::new(question.id, text);
        self.record(index, answer, evaluation);
        Ok(&self.evaluations[index])
    }

    /// Record a skip for question `index`, scoring 0 without consulting any strategy.
    pub fn skip(&mut self, index: usize) -> Result<&Evaluation, SessionError> {
        self.check_writable(index)?;
        let answer = Answer::new(self.questions[index].id, "");
        self.record(index, answer, Evaluation::skipped());
        Ok(&self.evaluations[index])
    }

    /// Aggregate a completed session.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::Incomplete {
                evaluated: self.evaluations.len(),
                total: self.questions.len(),
            });
        }

        let average_score = if self.evaluations.is_empty() {
            0.0
        } else {
            self.evaluations.iter().map(|e| e.score).sum::<f64>() / self.evaluations.len() as f64
        };

        let strengths = self
            .evaluations
            .iter()
            .flat_map(|e| e.strengths.iter().cloned())
            .collect();
        let weaknesses = self
            .evaluations
            .iter()
            .flat_map(|e| e.weaknesses.iter().cloned())
            .collect();

        Ok(SessionSummary {
            question_count: self.questions.len(),
            answered: self.answers.iter().filter(|a| !a.is_skipped()).count(),
            skipped: self.answers.iter().filter(|a| a.is_skipped()).count(),
            average_score,
            strengths,
            weaknesses,
        })
    }

    /// Question/answer/evaluation triples for export, in question order.
    pub fn qa_items(&self) -> Vec<QaItem> {
        self.questions
            .iter()
            .zip(self.answers.iter().zip(&self.evaluations))
            .map(|(question, (answer, evaluation))| QaItem {
                question: question.text.clone(),
                answer: answer.text.clone(),
                skipped: answer.is_skipped(),
                eval: evaluation.clone(),
            })
            .collect()
    }
}

/// Aggregate statistics for a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub question_count: usize,
    pub answered: usize,
    pub skipped: usize,
    /// Arithmetic mean of all evaluation scores, 0 for an empty session.
    pub average_score: f64,
    /// Deduplicated strengths across all evaluations.
    pub strengths: BTreeSet<String>,
    /// Deduplicated weaknesses across all evaluations.
    pub weaknesses: BTreeSet<String>,
}

/// One exported question with its answer and evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub skipped: bool,
    pub eval: Evaluation,
}

/// Holds the driver's current session, if any. Starting replaces whatever
/// was there before.
#[derive(Debug, Default)]
pub struct SessionSlot {
    session: Option<Session>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a session, discarding the previous one.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        setup: &InterviewSetup,
        rng: &mut R,
    ) -> &mut Session {
        self.session.insert(Session::start(bank, setup, rng))
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map_or(SessionPhase::NotStarted, Session::phase)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Abandon the current session.
    pub fn clear(&mut self) -> Option<Session> {
        self.session.take()
    }
}
