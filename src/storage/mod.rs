//! Persistence module for prepify
//!
//! SQLite-backed storage for interview sessions, per-question answers, and
//! generated reports.

mod database;
mod models;
mod repository;

pub use database::Database;
pub use models::{AnswerDigest, AnswerRecord, InterviewRecord, ReportDetail, ReportRecord};
pub use repository::Repository;
