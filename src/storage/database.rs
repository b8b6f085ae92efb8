//! SQLite database management

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::config::Settings;
use crate::report::Score;
use crate::storage::models::{AnswerRecord, InterviewRecord, ReportDetail, ReportRecord};

/// Database wrapper for prepify
pub struct Database {
    conn: Connection,
}

const CURRENT_SCHEMA_VERSION: i64 = 1;

impl Database {
    /// Open or create the database
    pub fn open(settings: &Settings) -> Result<Self> {
        let db_path = settings.database_path();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::open_path(&db_path)
    }

    /// Open database at a specific path (useful for testing)
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        // Enable foreign keys
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let current_version = self.schema_version()?;
        if current_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        if current_version < 1 {
            self.migrate_to_v1()?;
            self.set_schema_version(1)?;
        }

        Ok(())
    }

    /// Current schema version tracked in PRAGMA user_version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }

    fn set_schema_version(&self, version: i64) -> Result<()> {
        self.conn
            .execute(&format!("PRAGMA user_version = {}", version), [])?;
        Ok(())
    }

    fn migrate_to_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS interviews (
                id TEXT PRIMARY KEY,
                job_position TEXT NOT NULL,
                job_description TEXT NOT NULL,
                experience_years TEXT NOT NULL,
                questions TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_interviews_created_at
                ON interviews(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_interviews_created_by
                ON interviews(created_by);
            "#,
        )?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                interview_id TEXT NOT NULL,
                question_index INTEGER NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                rating INTEGER,
                strengths TEXT NOT NULL DEFAULT '[]',
                improvements TEXT NOT NULL DEFAULT '[]',
                advice TEXT,
                created_at INTEGER NOT NULL,
                UNIQUE(interview_id, question_index),
                FOREIGN KEY (interview_id) REFERENCES interviews(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_answers_interview_id
                ON answers(interview_id);
            "#,
        )?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                interview_id TEXT NOT NULL UNIQUE,
                job_position TEXT NOT NULL,
                overall_score INTEGER NOT NULL,
                communication_score INTEGER NOT NULL,
                technical_knowledge_score INTEGER NOT NULL,
                problem_solving_score INTEGER NOT NULL,
                strengths TEXT NOT NULL,
                improvements TEXT NOT NULL,
                question_count INTEGER NOT NULL,
                answered_count INTEGER NOT NULL,
                detail TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (interview_id) REFERENCES interviews(id) ON DELETE CASCADE
            );
            "#,
        )?;

        Ok(())
    }

    /// Insert a new interview session
    pub fn insert_interview(&self, interview: &InterviewRecord) -> Result<()> {
        let questions_json = serde_json::to_string(&interview.questions)?;

        self.conn.execute(
            r#"
            INSERT INTO interviews (id, job_position, job_description, experience_years, questions, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                interview.id,
                interview.job_position,
                interview.job_description,
                interview.experience_years,
                questions_json,
                interview.created_by,
                interview.created_at.timestamp(),
            ],
        )?;

        Ok(())
    }

    /// Get an interview by ID
    pub fn get_interview(&self, id: &str) -> Result<Option<InterviewRecord>> {
        let result = self.conn.query_row(
            "SELECT id, job_position, job_description, experience_years, questions, created_by, created_at
             FROM interviews WHERE id = ?1",
            params![id],
            |row| Ok(Self::row_to_interview(row)),
        ).optional()?;

        match result {
            Some(r) => Ok(Some(r?)),
            None => Ok(None),
        }
    }

    /// Find an interview by ID prefix
    pub fn find_interview_by_prefix(&self, prefix: &str) -> Result<Option<InterviewRecord>> {
        let pattern = format!("{}%", prefix);

        let result = self.conn.query_row(
            "SELECT id, job_position, job_description, experience_years, questions, created_by, created_at
             FROM interviews WHERE id LIKE ?1 LIMIT 1",
            params![pattern],
            |row| Ok(Self::row_to_interview(row)),
        ).optional()?;

        match result {
            Some(r) => Ok(Some(r?)),
            None => Ok(None),
        }
    }

    /// List interviews ordered by creation date, newest first, optionally
    /// filtered by creator
    pub fn list_interviews(
        &self,
        created_by: Option<&str>,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>> {
        let rows = match created_by {
            Some(creator) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, job_position, job_description, experience_years, questions, created_by, created_at
                     FROM interviews
                     WHERE created_by = ?1
                     ORDER BY created_at DESC
                     LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(params![creator, limit], |row| {
                        Ok(Self::row_to_interview(row))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, job_position, job_description, experience_years, questions, created_by, created_at
                     FROM interviews
                     ORDER BY created_at DESC
                     LIMIT ?1",
                )?;
                let rows = stmt
                    .query_map(params![limit], |row| Ok(Self::row_to_interview(row)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        let interviews = rows.into_iter().collect::<Result<Vec<_>>>()?;

        Ok(interviews)
    }

    /// Insert an answer row. First write wins: an answer already stored for
    /// the same (interview, question) slot is left untouched.
    pub fn insert_answer(&self, answer: &AnswerRecord) -> Result<i64> {
        let strengths_json = serde_json::to_string(&answer.strengths)?;
        let improvements_json = serde_json::to_string(&answer.improvements)?;

        self.conn.execute(
            r#"
            INSERT OR IGNORE INTO answers
                (interview_id, question_index, question, answer, rating, strengths, improvements, advice, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                answer.interview_id,
                answer.question_index as i64,
                answer.question,
                answer.answer,
                answer.rating.map(|r| i64::from(r.value())),
                strengths_json,
                improvements_json,
                answer.advice,
                answer.created_at.timestamp(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get answer rows for an interview, in question order
    pub fn answers_for_interview(&self, interview_id: &str) -> Result<Vec<AnswerRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, interview_id, question_index, question, answer, rating, strengths, improvements, advice, created_at
             FROM answers
             WHERE interview_id = ?1
             ORDER BY question_index",
        )?;

        let answers = stmt
            .query_map(params![interview_id], |row| Ok(Self::row_to_answer(row)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(answers)
    }

    /// Whether a report row already exists for an interview
    pub fn report_exists(&self, interview_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reports WHERE interview_id = ?1",
            params![interview_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a report row. Callers must check [`Self::report_exists`]
    /// first; the UNIQUE constraint backstops the check.
    pub fn insert_report(&self, report: &ReportRecord) -> Result<i64> {
        let detail_json = serde_json::to_string(&report.detail)?;

        self.conn.execute(
            r#"
            INSERT INTO reports
                (interview_id, job_position, overall_score, communication_score,
                 technical_knowledge_score, problem_solving_score, strengths, improvements,
                 question_count, answered_count, detail, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                report.interview_id,
                report.job_position,
                i64::from(report.overall_score.value()),
                i64::from(report.communication_score.value()),
                i64::from(report.technical_knowledge_score.value()),
                i64::from(report.problem_solving_score.value()),
                report.strengths,
                report.improvements,
                report.question_count as i64,
                report.answered_count as i64,
                detail_json,
                report.created_at.timestamp(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Get the report for an interview, if one was generated
    pub fn get_report(&self, interview_id: &str) -> Result<Option<ReportRecord>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, interview_id, job_position, overall_score, communication_score,
                        technical_knowledge_score, problem_solving_score, strengths, improvements,
                        question_count, answered_count, detail, created_at
                 FROM reports WHERE interview_id = ?1",
                params![interview_id],
                |row| Ok(Self::row_to_report(row)),
            )
            .optional()?;

        match result {
            Some(r) => Ok(Some(r?)),
            None => Ok(None),
        }
    }

    // Row mappers

    fn row_to_interview(row: &rusqlite::Row) -> Result<InterviewRecord> {
        let questions_json: String = row.get(4)?;
        let created_timestamp: i64 = row.get(6)?;

        Ok(InterviewRecord {
            id: row.get(0)?,
            job_position: row.get(1)?,
            job_description: row.get(2)?,
            experience_years: row.get(3)?,
            questions: serde_json::from_str(&questions_json).unwrap_or_default(),
            created_by: row.get(5)?,
            created_at: Utc.timestamp_opt(created_timestamp, 0).unwrap(),
        })
    }

    fn row_to_answer(row: &rusqlite::Row) -> Result<AnswerRecord> {
        let rating: Option<i64> = row.get(5)?;
        let strengths_json: String = row.get(6)?;
        let improvements_json: String = row.get(7)?;
        let created_timestamp: i64 = row.get(9)?;

        Ok(AnswerRecord {
            id: row.get(0)?,
            interview_id: row.get(1)?,
            question_index: row.get::<_, i64>(2)? as usize,
            question: row.get(3)?,
            answer: row.get(4)?,
            rating: rating.and_then(|r| u8::try_from(r).ok()).and_then(Score::new),
            strengths: serde_json::from_str(&strengths_json).unwrap_or_default(),
            improvements: serde_json::from_str(&improvements_json).unwrap_or_default(),
            advice: row.get(8)?,
            created_at: Utc.timestamp_opt(created_timestamp, 0).unwrap(),
        })
    }

    fn row_to_report(row: &rusqlite::Row) -> Result<ReportRecord> {
        let detail_json: String = row.get(11)?;
        let created_timestamp: i64 = row.get(12)?;

        let score_at = |index: usize| -> Result<Score> {
            let value: i64 = row.get(index)?;
            u8::try_from(value)
                .ok()
                .and_then(Score::new)
                .with_context(|| format!("Stored score {} is out of range", value))
        };

        Ok(ReportRecord {
            id: row.get(0)?,
            interview_id: row.get(1)?,
            job_position: row.get(2)?,
            overall_score: score_at(3)?,
            communication_score: score_at(4)?,
            technical_knowledge_score: score_at(5)?,
            problem_solving_score: score_at(6)?,
            strengths: row.get(7)?,
            improvements: row.get(8)?,
            question_count: row.get::<_, i64>(9)? as usize,
            answered_count: row.get::<_, i64>(10)? as usize,
            detail: serde_json::from_str::<ReportDetail>(&detail_json).unwrap_or_default(),
            created_at: Utc.timestamp_opt(created_timestamp, 0).unwrap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Question, SessionPlan};

    fn sample_plan() -> SessionPlan {
        SessionPlan {
            job_position: "Backend Engineer".to_string(),
            job_description: "Rust services".to_string(),
            experience_years: "3".to_string(),
            resume_text: None,
            created_by: "test@example.com".to_string(),
            question_count: 2,
        }
    }

    fn sample_questions() -> Vec<Question> {
        vec![
            Question {
                text: "Why Rust?".to_string(),
                skill_tested: Some("Motivation".to_string()),
                ideal_answer_elements: vec!["Mention ownership".to_string()],
            },
            Question {
                text: "Describe a hard bug.".to_string(),
                skill_tested: None,
                ideal_answer_elements: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_create_database() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_insert_and_get_interview() {
        let db = Database::open_memory().unwrap();

        let interview = InterviewRecord::new(&sample_plan(), sample_questions());
        db.insert_interview(&interview).unwrap();

        let retrieved = db.get_interview(&interview.id).unwrap().unwrap();
        assert_eq!(retrieved.job_position, "Backend Engineer");
        assert_eq!(retrieved.questions.len(), 2);
        assert_eq!(retrieved.questions[0].text, "Why Rust?");
    }

    #[test]
    fn test_duplicate_answer_slot_is_ignored() {
        let db = Database::open_memory().unwrap();

        let interview = InterviewRecord::new(&sample_plan(), sample_questions());
        db.insert_interview(&interview).unwrap();

        let answer = AnswerRecord::new(
            interview.id.clone(),
            0,
            "Why Rust?".to_string(),
            "Because the compiler has my back".to_string(),
            None,
        );
        db.insert_answer(&answer).unwrap();

        let mut second = answer.clone();
        second.answer = "A different answer".to_string();
        db.insert_answer(&second).unwrap();

        let answers = db.answers_for_interview(&interview.id).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "Because the compiler has my back");
    }
}
