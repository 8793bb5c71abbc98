//! Uploaded file metadata

use rusqlite::{params, OptionalExtension};

use super::{now_millis, to_datetime, Database};
use crate::error::{Error, Result};
use crate::types::{FileRecord, NewFile};

/// User allowed to delete any file
pub const ADMIN_USER: &str = "admin";

/// Whether `user` may delete `file`
pub fn can_delete_file(file: &FileRecord, user: &str) -> bool {
    user == file.uploader || user == ADMIN_USER
}

impl Database {
    /// Files for a subject, newest first
    pub fn list_files(&self, subject: &str) -> Result<Vec<FileRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, subject, original_name, stored_path, uploader, uploaded_at
            FROM files
            WHERE subject = ?1
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![subject], |row| Self::row_to_file(row))?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row?);
        }
        Ok(files)
    }

    /// Record metadata for a stored upload
    pub fn store_file_metadata(&self, file: &NewFile) -> Result<FileRecord> {
        let uploaded_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO files (subject, original_name, stored_path, uploader, uploaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                file.subject,
                file.original_name,
                file.stored_path,
                file.uploader,
                uploaded_at,
            ],
        )?;

        Ok(FileRecord {
            id: self.conn.last_insert_rowid(),
            subject: file.subject.clone(),
            original_name: file.original_name.clone(),
            stored_path: file.stored_path.clone(),
            uploader: file.uploader.clone(),
            uploaded_at: to_datetime(uploaded_at),
        })
    }

    /// Get a file record by ID
    pub fn get_file(&self, id: i64) -> Result<Option<FileRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, subject, original_name, stored_path, uploader, uploaded_at
                FROM files WHERE id = ?1
                "#,
                params![id],
                |row| Self::row_to_file(row),
            )
            .optional()?;
        Ok(result)
    }

    /// Delete file metadata on behalf of `requesting_user`.
    ///
    /// Returns the removed record so the caller can dispose of the stored
    /// object. The row is left untouched when the user is not allowed.
    pub fn delete_file(&mut self, id: i64, requesting_user: &str) -> Result<FileRecord> {
        let tx = self.conn.transaction()?;
        let file = tx
            .query_row(
                r#"
                SELECT id, subject, original_name, stored_path, uploader, uploaded_at
                FROM files WHERE id = ?1
                "#,
                params![id],
                |row| Self::row_to_file(row),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("File {} not found", id)))?;

        if !can_delete_file(&file, requesting_user) {
            return Err(Error::Permission(format!(
                "User '{}' may not delete file {}",
                requesting_user, id
            )));
        }

        tx.execute("DELETE FROM files WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(file)
    }

    fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<FileRecord> {
        Ok(FileRecord {
            id: row.get(0)?,
            subject: row.get(1)?,
            original_name: row.get(2)?,
            stored_path: row.get(3)?,
            uploader: row.get(4)?,
            uploaded_at: to_datetime(row.get(5)?),
        })
    }
}
