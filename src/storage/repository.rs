//! Repository pattern wrapper for database operations
//!
//! Provides a higher-level interface for the storage operations the
//! session controller and the CLI need.

use anyhow::Result;
use std::path::Path;

use crate::config::Settings;
use crate::session::{Question, SessionPlan};
use crate::storage::{AnswerRecord, Database, InterviewRecord, ReportRecord};

/// Repository for interviews, answers, and reports
pub struct Repository {
    db: Database,
}

impl Repository {
    /// Create a new repository
    pub fn new(settings: &Settings) -> Result<Self> {
        let db = Database::open(settings)?;
        Ok(Self { db })
    }

    /// Open a repository at a specific database path (useful for testing)
    pub fn open_path(path: &Path) -> Result<Self> {
        let db = Database::open_path(path)?;
        Ok(Self { db })
    }

    /// Create and store a new interview session with its question set
    pub fn create_interview(
        &self,
        plan: &SessionPlan,
        questions: Vec<Question>,
    ) -> Result<InterviewRecord> {
        let interview = InterviewRecord::new(plan, questions);
        self.db.insert_interview(&interview)?;
        Ok(interview)
    }

    /// Get an interview by ID
    pub fn get_interview(&self, id: &str) -> Result<Option<InterviewRecord>> {
        self.db.get_interview(id)
    }

    /// Find an interview by ID prefix
    pub fn find_interview(&self, prefix: &str) -> Result<Option<InterviewRecord>> {
        self.db.find_interview_by_prefix(prefix)
    }

    /// List recent interviews, newest first, optionally filtered by creator
    pub fn list_recent(
        &self,
        created_by: Option<&str>,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>> {
        self.db.list_interviews(created_by, limit)
    }

    /// Store one answered question. First write for a question slot wins.
    pub fn record_answer(&self, answer: &AnswerRecord) -> Result<()> {
        self.db.insert_answer(answer)?;
        Ok(())
    }

    /// Get all stored answers for an interview, in question order
    pub fn answers_for(&self, interview_id: &str) -> Result<Vec<AnswerRecord>> {
        self.db.answers_for_interview(interview_id)
    }

    /// Store a report unless one already exists for the interview.
    /// Returns `true` when this call created the row.
    pub fn save_report(&self, report: &ReportRecord) -> Result<bool> {
        if self.db.report_exists(&report.interview_id)? {
            return Ok(false);
        }
        self.db.insert_report(report)?;
        Ok(true)
    }

    /// Get the stored report for an interview, if any
    pub fn get_report(&self, interview_id: &str) -> Result<Option<ReportRecord>> {
        self.db.get_report(interview_id)
    }
}
