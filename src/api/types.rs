//! Request and response types for the HTTP API
//!
//! Request bodies keep every field optional so that a missing field becomes a
//! 400 with a field-specific message instead of a deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Reflection, User, XpTotals};

/// Require a non-blank string field
pub fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::missing(field)),
    }
}

/// Require an actor id given as any non-null JSON scalar.
///
/// Graders may be identified by number, and `0` is a valid id.
pub fn required_actor(value: Option<Value>, field: &str) -> Result<String> {
    match value {
        None | Some(Value::Null) => Err(Error::missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Error::missing(field)),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(Error::Validation(format!("Invalid field: {}", field))),
    }
}

/// Require a record id given as a JSON number or numeric string
pub fn required_id(value: Option<Value>, field: &str) -> Result<i64> {
    match value {
        None | Some(Value::Null) => Err(Error::missing(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(Error::missing(field)),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::Validation(format!("Invalid field: {}", field))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("Invalid field: {}", field))),
        Some(_) => Err(Error::Validation(format!("Invalid field: {}", field))),
    }
}

/// Drop blank optional text
pub fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =========================================================================
// Query strings
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct SubjectQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileDeleteQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersQuery {
    pub question_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradesQuery {
    pub answer_id: Option<i64>,
}

// =========================================================================
// Bodies
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub subject: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub author: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddXpRequest {
    pub username: Option<String>,
    pub amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReflectionRequest {
    pub username: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReflectionIdRequest {
    pub id: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub subject: Option<String>,
    pub text: Option<String>,
    #[serde(alias = "suggestedAnswer")]
    pub suggested: Option<String>,
    pub created_by: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    pub question_id: Option<Value>,
    pub answer_text: Option<String>,
    pub answered_by: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeAnswerRequest {
    pub answer_id: Option<Value>,
    pub question_id: Option<Value>,
    pub is_correct: Option<bool>,
    pub feedback: Option<String>,
    pub graded_by: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SetProgressRequest {
    pub username: Option<String>,
    pub subject: Option<String>,
    pub value: Option<i64>,
}

// =========================================================================
// Responses
// =========================================================================

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Counters of a user; `autoCreated` is set when the lookup created the account
#[derive(Debug, Serialize)]
pub struct XpResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "autoCreated")]
    pub auto_created: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct XpAwardResponse {
    pub username: String,
    #[serde(flatten)]
    pub totals: XpTotals,
}

/// A new reflection plus the outcome of its XP award
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionCreatedResponse {
    #[serde(flatten)]
    pub reflection: Reflection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<XpAwardResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(None, "subject").is_err());
        assert!(required(Some("  ".into()), "subject").is_err());
        assert_eq!(required(Some("Ethics".into()), "subject").unwrap(), "Ethics");
    }

    #[test]
    fn test_required_actor_accepts_zero() {
        assert_eq!(required_actor(Some(json!(0)), "gradedBy").unwrap(), "0");
        assert_eq!(required_actor(Some(json!("ana")), "gradedBy").unwrap(), "ana");
        assert!(required_actor(Some(Value::Null), "gradedBy").is_err());
        assert!(required_actor(None, "gradedBy").is_err());
        assert!(required_actor(Some(json!({"id": 1})), "gradedBy").is_err());
    }

    #[test]
    fn test_required_id_parses_numbers_and_strings() {
        assert_eq!(required_id(Some(json!(7)), "id").unwrap(), 7);
        assert_eq!(required_id(Some(json!("7")), "id").unwrap(), 7);
        assert!(required_id(Some(json!("seven")), "id").is_err());
        assert!(required_id(Some(json!(1.5)), "id").is_err());
        assert!(required_id(None, "id").is_err());
    }
}
