//! Interview session state machine.
//!
//! A `Session` walks the bank in order: `start` resets everything, then each
//! `submit` or `skip` records one grade and moves to the next question. The
//! progression is linear; an answered question cannot be revisited.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::bank::{Question, QuestionBank};
use crate::error::SessionError;
use crate::grading::{self, Grade};
use crate::report::{overall_score, InterviewReport, Transcript};
use crate::table::{self, MonthlyAggregate, Table, Validation, PREVIEW_ROWS};

/// Where the session is in the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Index of the question awaiting an answer.
    InProgress(usize),
    Complete,
}

/// One candidate's interview, held in memory.
#[derive(Debug, Clone)]
pub struct Session {
    bank: QuestionBank,
    id: Uuid,
    candidate: String,
    started_at: Option<DateTime<Utc>>,
    current: usize,
    responses: BTreeMap<String, String>,
    grades: BTreeMap<String, Grade>,
    upload_preview: Option<Vec<Map<String, Value>>>,
    monthly: Option<MonthlyAggregate>,
    /// Validator note from an upload on the current question.
    pending_note: Option<String>,
    preview_rows: usize,
}

impl Session {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            id: Uuid::nil(),
            candidate: String::new(),
            started_at: None,
            current: 0,
            responses: BTreeMap::new(),
            grades: BTreeMap::new(),
            upload_preview: None,
            monthly: None,
            pending_note: None,
            preview_rows: PREVIEW_ROWS,
        }
    }

    /// Override how many uploaded rows are kept for the transcript.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Start (or restart) the interview, discarding anything recorded so far.
    pub fn start(&mut self, candidate: impl Into<String>, now: DateTime<Utc>) {
        self.id = Uuid::new_v4();
        self.candidate = candidate.into();
        self.started_at = Some(now);
        self.current = 0;
        self.responses.clear();
        self.grades.clear();
        self.upload_preview = None;
        self.monthly = None;
        self.pending_note = None;
        tracing::info!(
            session = %self.id,
            candidate = %self.candidate,
            questions = self.bank.len(),
            "interview started"
        );
    }

    pub fn state(&self) -> SessionState {
        if self.started_at.is_none() {
            SessionState::NotStarted
        } else if self.current >= self.bank.len() {
            SessionState::Complete
        } else {
            SessionState::InProgress(self.current)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    /// The question awaiting an answer, if the interview is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state() {
            SessionState::InProgress(i) => self.bank.get(i),
            _ => None,
        }
    }

    fn active_question(&self) -> Result<&Question, SessionError> {
        match self.state() {
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::Complete => Err(SessionError::Complete),
            SessionState::InProgress(i) => self.bank.get(i).ok_or(SessionError::Complete),
        }
    }

    /// Attach a table to the current hands-on question.
    ///
    /// The validator note is merged into the grade when the answer is
    /// submitted. A later upload on the same question replaces it.
    pub fn upload(&mut self, table: &Table) -> Result<Validation, SessionError> {
        let question = self.active_question()?;
        if !question.kind.accepts_upload() {
            return Err(SessionError::UploadNotAccepted {
                question_id: question.id.clone(),
            });
        }

        let validation = table::validate(table);
        self.upload_preview = Some(table.preview(self.preview_rows));
        self.monthly = validation.monthly.clone();
        self.pending_note = Some(validation.note.clone());
        Ok(validation)
    }

    /// Record and grade an answer for the current question, then advance.
    pub fn submit(&mut self, answer: &str) -> Result<&Grade, SessionError> {
        let question = self.active_question()?;
        let id = question.id.clone();
        let hands_on = question.kind.accepts_upload();
        let mut grade = grading::grade(question, answer);
        if hands_on {
            if let Some(note) = self.pending_note.take() {
                grade.notes.push(note);
            }
        }
        self.record(id.clone(), answer.to_string(), grade);
        Ok(&self.grades[&id])
    }

    /// Skip the current question: empty response, zero score.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        let id = self.active_question()?.id.clone();
        self.record(id, String::new(), Grade::skipped());
        Ok(())
    }

    fn record(&mut self, id: String, answer: String, grade: Grade) {
        tracing::debug!(question = %id, score = grade.score, "response recorded");
        self.responses.insert(id.clone(), answer);
        self.grades.insert(id, grade);
        self.pending_note = None;
        self.current += 1;
        if self.is_complete() {
            tracing::info!(
                session = %self.id,
                overall = self.overall_score(),
                "interview complete"
            );
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn responses(&self) -> &BTreeMap<String, String> {
        &self.responses
    }

    pub fn grades(&self) -> &BTreeMap<String, Grade> {
        &self.grades
    }

    pub fn upload_preview(&self) -> Option<&[Map<String, Value>]> {
        self.upload_preview.as_deref()
    }

    pub fn monthly(&self) -> Option<&MonthlyAggregate> {
        self.monthly.as_ref()
    }

    /// Number of questions answered or skipped so far.
    pub fn answered(&self) -> usize {
        self.responses.len()
    }

    pub fn has_responses(&self) -> bool {
        !self.responses.is_empty()
    }

    pub fn overall_score(&self) -> f64 {
        overall_score(&self.bank, &self.grades)
    }

    pub fn report(&self) -> InterviewReport {
        InterviewReport::build(&self.bank, &self.responses, &self.grades)
    }

    /// Export everything recorded so far.
    pub fn transcript(&self, finished_at: DateTime<Utc>) -> Result<Transcript, SessionError> {
        let started_at = self.started_at.ok_or(SessionError::NotStarted)?;
        let report = self.report();

        Ok(Transcript {
            candidate: self.candidate.clone(),
            session_id: self.id,
            started_at,
            finished_at,
            responses: self.responses.clone(),
            scores: self
                .grades
                .iter()
                .map(|(id, g)| (id.clone(), g.score))
                .collect(),
            notes: self
                .grades
                .iter()
                .map(|(id, g)| (id.clone(), g.notes.clone()))
                .collect(),
            overall: report.overall,
            strengths: report.strengths,
            weaknesses: report.weaknesses,
            review_queue: report.review_queue,
            upload_preview: self.upload_preview.clone(),
            monthly_totals: self.monthly.clone(),
        })
    }
}
