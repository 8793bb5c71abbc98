//! Question, answer and grade handlers

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::types::{
    optional, required, required_actor, required_id, AnswersQuery, CreateAnswerRequest,
    CreateQuestionRequest, GradeAnswerRequest, GradesQuery, SubjectQuery, SuccessResponse,
};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::{Answer, Grade, NewAnswer, NewGrade, NewQuestion, Question};

pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubjectQuery>,
) -> Result<Json<Vec<Question>>> {
    let subject = optional(query.subject);
    let questions = state.db().list_questions(subject.as_deref())?;
    Ok(Json(questions))
}

pub async fn create_question(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateQuestionRequest>,
) -> Result<Json<Question>> {
    let question = NewQuestion {
        subject: required(req.subject, "subject")?,
        text: required(req.text, "text")?,
        suggested_answer: optional(req.suggested),
        created_by: required_actor(req.created_by, "createdBy")?,
    };

    let question = state.db().create_question(&question)?;
    info!("Created question {} in {}", question.id, question.subject);
    Ok(Json(question))
}

/// Delete a question with its answers and grades
pub async fn delete_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SuccessResponse>> {
    state.db().delete_question_cascade(id)?;
    info!("Deleted question {} with its answers and grades", id);
    Ok(Json(SuccessResponse::ok()))
}

pub async fn list_answers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AnswersQuery>,
) -> Result<Json<Vec<Answer>>> {
    let answers = state.db().list_answers(query.question_id)?;
    Ok(Json(answers))
}

pub async fn create_answer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateAnswerRequest>,
) -> Result<Json<Answer>> {
    let answer = NewAnswer {
        question_id: required_id(req.question_id, "questionId")?,
        answer_text: required(req.answer_text, "answerText")?,
        answered_by: required_actor(req.answered_by, "answeredBy")?,
    };

    let answer = state.db().create_answer(&answer)?;
    info!("Recorded answer {} to question {}", answer.id, answer.question_id);
    Ok(Json(answer))
}

pub async fn list_grades(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GradesQuery>,
) -> Result<Json<Vec<Grade>>> {
    let grades = state.db().list_grades(query.answer_id)?;
    Ok(Json(grades))
}

/// Grade an answer; any previous grade for it is replaced
pub async fn grade_answer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GradeAnswerRequest>,
) -> Result<Json<Grade>> {
    let grade = NewGrade {
        answer_id: required_id(req.answer_id, "answerId")?,
        question_id: required_id(req.question_id, "questionId")?,
        is_correct: req.is_correct.ok_or_else(|| Error::missing("isCorrect"))?,
        feedback: optional(req.feedback),
        graded_by: required_actor(req.graded_by, "gradedBy")?,
    };

    let grade = state.db().grade_answer(&grade)?;
    info!(
        "Graded answer {} as {}",
        grade.answer_id,
        if grade.is_correct { "correct" } else { "incorrect" }
    );
    Ok(Json(grade))
}
