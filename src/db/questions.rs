//! Questions, answers and grades

use rusqlite::params;

use super::{now_millis, to_datetime, Database};
use crate::error::Result;
use crate::types::{Answer, Grade, NewAnswer, NewGrade, NewQuestion, Question};

impl Database {
    // =========================================================================
    // Questions
    // =========================================================================

    /// Questions newest first, optionally restricted to one subject
    pub fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>> {
        let sql = if subject.is_some() {
            r#"
            SELECT id, subject, text, suggested_answer, created_by, created_at
            FROM questions
            WHERE subject = ?1
            ORDER BY created_at DESC, id DESC
            "#
        } else {
            r#"
            SELECT id, subject, text, suggested_answer, created_by, created_at
            FROM questions
            ORDER BY created_at DESC, id DESC
            "#
        };

        let mut stmt = self.conn.prepare(sql)?;
        let mut questions = Vec::new();

        if let Some(subject) = subject {
            let rows = stmt.query_map(params![subject], |row| Self::row_to_question(row))?;
            for row in rows {
                questions.push(row?);
            }
        } else {
            let rows = stmt.query_map([], |row| Self::row_to_question(row))?;
            for row in rows {
                questions.push(row?);
            }
        }

        Ok(questions)
    }

    pub fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        let created_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO questions (subject, text, suggested_answer, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                question.subject,
                question.text,
                question.suggested_answer,
                question.created_by,
                created_at,
            ],
        )?;

        Ok(Question {
            id: self.conn.last_insert_rowid(),
            subject: question.subject.clone(),
            text: question.text.clone(),
            suggested_answer: question.suggested_answer.clone(),
            created_by: question.created_by.clone(),
            created_at: to_datetime(created_at),
        })
    }

    /// Delete a question together with its answers and grades.
    /// Unknown ids are not an error.
    pub fn delete_question_cascade(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            DELETE FROM grades
            WHERE question_id = ?1
               OR answer_id IN (SELECT id FROM answers WHERE question_id = ?1)
            "#,
            params![id],
        )?;
        tx.execute("DELETE FROM answers WHERE question_id = ?1", params![id])?;
        tx.execute("DELETE FROM questions WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn row_to_question(row: &rusqlite::Row) -> rusqlite::Result<Question> {
        Ok(Question {
            id: row.get(0)?,
            subject: row.get(1)?,
            text: row.get(2)?,
            suggested_answer: row.get(3)?,
            created_by: row.get(4)?,
            created_at: to_datetime(row.get(5)?),
        })
    }

    // =========================================================================
    // Answers
    // =========================================================================

    /// Answers oldest first, optionally restricted to one question
    pub fn list_answers(&self, question_id: Option<i64>) -> Result<Vec<Answer>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, question_id, answer_text, answered_by, created_at
            FROM answers
            WHERE ?1 IS NULL OR question_id = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![question_id], |row| {
            Ok(Answer {
                id: row.get(0)?,
                question_id: row.get(1)?,
                answer_text: row.get(2)?,
                answered_by: row.get(3)?,
                created_at: to_datetime(row.get(4)?),
            })
        })?;

        let mut answers = Vec::new();
        for row in rows {
            answers.push(row?);
        }
        Ok(answers)
    }

    pub fn create_answer(&self, answer: &NewAnswer) -> Result<Answer> {
        let created_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO answers (question_id, answer_text, answered_by, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![answer.question_id, answer.answer_text, answer.answered_by, created_at],
        )?;

        Ok(Answer {
            id: self.conn.last_insert_rowid(),
            question_id: answer.question_id,
            answer_text: answer.answer_text.clone(),
            answered_by: answer.answered_by.clone(),
            created_at: to_datetime(created_at),
        })
    }

    // =========================================================================
    // Grades
    // =========================================================================

    /// Grades newest first, optionally restricted to one answer
    pub fn list_grades(&self, answer_id: Option<i64>) -> Result<Vec<Grade>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, answer_id, question_id, is_correct, feedback, graded_by, created_at
            FROM grades
            WHERE ?1 IS NULL OR answer_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![answer_id], |row| {
            Ok(Grade {
                id: row.get(0)?,
                answer_id: row.get(1)?,
                question_id: row.get(2)?,
                is_correct: row.get(3)?,
                feedback: row.get(4)?,
                graded_by: row.get(5)?,
                created_at: to_datetime(row.get(6)?),
            })
        })?;

        let mut grades = Vec::new();
        for row in rows {
            grades.push(row?);
        }
        Ok(grades)
    }

    /// Grade an answer, replacing any previous grade for it
    pub fn grade_answer(&mut self, grade: &NewGrade) -> Result<Grade> {
        let created_at = now_millis();
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM grades WHERE answer_id = ?1",
            params![grade.answer_id],
        )?;
        tx.execute(
            r#"
            INSERT INTO grades (answer_id, question_id, is_correct, feedback, graded_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                grade.answer_id,
                grade.question_id,
                grade.is_correct,
                grade.feedback,
                grade.graded_by,
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Grade {
            id,
            answer_id: grade.answer_id,
            question_id: grade.question_id,
            is_correct: grade.is_correct,
            feedback: grade.feedback.clone(),
            graded_by: grade.graded_by.clone(),
            created_at: to_datetime(created_at),
        })
    }
}
