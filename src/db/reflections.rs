//! Journal reflections with soft delete

use rusqlite::params;

use super::{now_millis, to_datetime, Database};
use crate::error::{Error, Result};
use crate::types::{NewReflection, Reflection, ReflectionFilter};

impl Database {
    pub fn create_reflection(&self, reflection: &NewReflection) -> Result<Reflection> {
        let created_at = now_millis();
        self.conn.execute(
            r#"
            INSERT INTO reflections (username, subject, content, mood, created_at, is_deleted)
            VALUES (?1, ?2, ?3, ?4, ?5, 0)
            "#,
            params![
                reflection.username,
                reflection.subject,
                reflection.content,
                reflection.mood,
                created_at,
            ],
        )?;

        Ok(Reflection {
            id: self.conn.last_insert_rowid(),
            username: reflection.username.clone(),
            subject: reflection.subject.clone(),
            content: reflection.content.clone(),
            mood: reflection.mood.clone(),
            created_at: to_datetime(created_at),
            is_deleted: false,
        })
    }

    /// Reflections of a user, newest first
    pub fn list_reflections(
        &self,
        username: &str,
        filter: ReflectionFilter,
    ) -> Result<Vec<Reflection>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, username, subject, content, mood, created_at, is_deleted
            FROM reflections
            WHERE username = ?1 AND is_deleted = ?2
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![username, filter.is_deleted()], |row| {
            Ok(Reflection {
                id: row.get(0)?,
                username: row.get(1)?,
                subject: row.get(2)?,
                content: row.get(3)?,
                mood: row.get(4)?,
                created_at: to_datetime(row.get(5)?),
                is_deleted: row.get(6)?,
            })
        })?;

        let mut reflections = Vec::new();
        for row in rows {
            reflections.push(row?);
        }
        Ok(reflections)
    }

    /// Hide a reflection from the default listing
    pub fn soft_delete_reflection(&self, id: i64) -> Result<()> {
        self.set_reflection_deleted(id, true)
    }

    /// Undo a soft delete
    pub fn restore_reflection(&self, id: i64) -> Result<()> {
        self.set_reflection_deleted(id, false)
    }

    fn set_reflection_deleted(&self, id: i64, deleted: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE reflections SET is_deleted = ?1 WHERE id = ?2",
            params![deleted, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("Reflection {} not found", id)));
        }
        Ok(())
    }
}
