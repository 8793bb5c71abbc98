//! Core type definitions for studytrack
//!
//! Defines the records stored for each resource. JSON field names follow the
//! client contract (camelCase), with the exception of `User::last_login`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account with its experience counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub xp: i64,
    pub level: i64,
    pub streak: i64,
    pub last_login: Option<DateTime<Utc>>,
}

/// Result of an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpTotals {
    pub xp: i64,
    pub level: i64,
}

/// One entry in the append-only XP ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpLogEntry {
    pub id: i64,
    pub username: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A study note with its comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub subject: String,
    pub author: String,
    pub content: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub note_id: i64,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub subject: String,
    pub original_name: String,
    /// Name of the stored object inside the upload directory
    pub stored_path: String,
    pub uploader: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A journal entry; soft-deleted entries keep their row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: i64,
    pub username: String,
    pub subject: String,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Which reflections a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionFilter {
    Active,
    Deleted,
}

impl ReflectionFilter {
    pub fn is_deleted(&self) -> bool {
        matches!(self, ReflectionFilter::Deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub subject: String,
    pub text: String,
    pub suggested_answer: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub answer_text: String,
    pub answered_by: String,
    pub created_at: DateTime<Utc>,
}

/// The current grade of an answer; regrading replaces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    pub answer_id: i64,
    pub question_id: i64,
    pub is_correct: bool,
    pub feedback: Option<String>,
    pub graded_by: String,
    pub created_at: DateTime<Utc>,
}

/// Progress value for one (username, subject) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: i64,
    pub username: String,
    pub subject: String,
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

/// Progress keyed by subject
pub type ProgressMap = BTreeMap<String, i64>;

// =========================================================================
// Inputs
// =========================================================================

#[derive(Debug, Clone)]
pub struct NewNote {
    pub subject: String,
    pub author: String,
    pub content: String,
    pub is_public: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub note_id: i64,
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub subject: String,
    pub original_name: String,
    pub stored_path: String,
    pub uploader: String,
}

#[derive(Debug, Clone)]
pub struct NewReflection {
    pub username: String,
    pub subject: String,
    pub content: String,
    pub mood: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub subject: String,
    pub text: String,
    pub suggested_answer: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: i64,
    pub answer_text: String,
    pub answered_by: String,
}

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub answer_id: i64,
    pub question_id: i64,
    pub is_correct: bool,
    pub feedback: Option<String>,
    pub graded_by: String,
}

/// Row counts reported by `studytrack status`
#[derive(Debug, Default)]
pub struct StoreStats {
    pub tables: Vec<(&'static str, u64)>,
    pub db_size_bytes: u64,
}

/// Static lesson catalog served at `/lessons`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCatalog {
    #[serde(default)]
    pub first_semester: Vec<serde_json::Value>,
    #[serde(default)]
    pub second_semester: Vec<serde_json::Value>,
}
