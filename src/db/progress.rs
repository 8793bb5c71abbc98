//! Per-subject progress values

use rusqlite::params;

use super::{now_millis, to_datetime, Database};
use crate::error::Result;
use crate::types::{Progress, ProgressMap};

impl Database {
    /// Insert or update the progress value for (username, subject).
    ///
    /// The upsert is a single statement against the unique (username, subject)
    /// constraint, so concurrent writers can never create a second row.
    pub fn set_progress(&self, username: &str, subject: &str, value: i64) -> Result<Progress> {
        let updated_at = now_millis();
        let progress = self.conn.query_row(
            r#"
            INSERT INTO progress (username, subject, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(username, subject) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            RETURNING id, username, subject, value, updated_at
            "#,
            params![username, subject, value, updated_at],
            |row| Self::row_to_progress(row),
        )?;
        Ok(progress)
    }

    /// All progress rows of a user, ordered by subject
    pub fn get_progress(&self, username: &str) -> Result<Vec<Progress>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, username, subject, value, updated_at
            FROM progress
            WHERE username = ?1
            ORDER BY subject
            "#,
        )?;
        let rows = stmt.query_map(params![username], |row| Self::row_to_progress(row))?;

        let mut progress = Vec::new();
        for row in rows {
            progress.push(row?);
        }
        Ok(progress)
    }

    /// Progress of a user as `subject -> value`
    pub fn get_progress_map(&self, username: &str) -> Result<ProgressMap> {
        Ok(self
            .get_progress(username)?
            .into_iter()
            .map(|p| (p.subject, p.value))
            .collect())
    }

    fn row_to_progress(row: &rusqlite::Row) -> rusqlite::Result<Progress> {
        Ok(Progress {
            id: row.get(0)?,
            username: row.get(1)?,
            subject: row.get(2)?,
            value: row.get(3)?,
            updated_at: to_datetime(row.get(4)?),
        })
    }
}
