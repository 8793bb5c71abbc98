//! Notes and their comments

use std::collections::HashMap;

use rusqlite::params;

use super::{now_millis, to_datetime, Database};
use crate::error::Result;
use crate::types::{Comment, NewComment, NewNote, Note};

impl Database {
    /// Notes for a subject, newest first, each with its comments oldest first
    pub fn list_notes(&self, subject: &str) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT c.id, c.note_id, c.author, c.content, c.created_at
            FROM comments c
            INNER JOIN notes n ON n.id = c.note_id
            WHERE n.subject = ?1
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![subject], |row| Self::row_to_comment(row))?;

        let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
        for row in rows {
            let comment = row?;
            comments.entry(comment.note_id).or_default().push(comment);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, subject, author, content, is_public, created_at
            FROM notes
            WHERE subject = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![subject], |row| {
            Ok(Note {
                id: row.get(0)?,
                subject: row.get(1)?,
                author: row.get(2)?,
                content: row.get(3)?,
                is_public: row.get(4)?,
                created_at: to_datetime(row.get(5)?),
                comments: Vec::new(),
            })
        })?;

        let mut notes = Vec::new();
        for row in rows {
            let mut note = row?;
            note.comments = comments.remove(&note.id).unwrap_or_default();
            notes.push(note);
        }
        Ok(notes)
    }

    /// Insert a note and return it with an empty comment list
    pub fn create_note(&self, note: &NewNote) -> Result<Note> {
        let created_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO notes (subject, author, content, is_public, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![note.subject, note.author, note.content, note.is_public, created_at],
        )?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            subject: note.subject.clone(),
            author: note.author.clone(),
            content: note.content.clone(),
            is_public: note.is_public,
            created_at: to_datetime(created_at),
            comments: Vec::new(),
        })
    }

    /// Delete a note and its comments. Unknown ids are not an error.
    pub fn delete_note(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM comments WHERE note_id = ?1", params![id])?;
        tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    /// Attach a comment to a note. The note is not required to exist.
    pub fn add_comment(&self, comment: &NewComment) -> Result<Comment> {
        let created_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO comments (note_id, author, content, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![comment.note_id, comment.author, comment.content, created_at],
        )?;

        Ok(Comment {
            id: self.conn.last_insert_rowid(),
            note_id: comment.note_id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            created_at: to_datetime(created_at),
        })
    }

    /// Comments attached to a note, oldest first
    pub fn get_comments(&self, note_id: i64) -> Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, note_id, author, content, created_at
            FROM comments
            WHERE note_id = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )?;
        let rows = stmt.query_map(params![note_id], |row| Self::row_to_comment(row))?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }

    fn row_to_comment(row: &rusqlite::Row) -> rusqlite::Result<Comment> {
        Ok(Comment {
            id: row.get(0)?,
            note_id: row.get(1)?,
            author: row.get(2)?,
            content: row.get(3)?,
            created_at: to_datetime(row.get(4)?),
        })
    }
}
