//! User accounts, XP accumulation and the XP ledger

use rusqlite::{params, OptionalExtension, Transaction};
use tracing::debug;

use super::{now_millis, to_datetime, Database};
use crate::error::Result;
use crate::types::{ExpLogEntry, User, XpTotals};
use crate::xp::{accumulate, STARTING_LEVEL};

impl Database {
    /// Add `amount` XP to a user, creating the account if needed.
    ///
    /// Read, level-up and write happen in one transaction, and the award is
    /// appended to the exp log in the same transaction.
    pub fn add_xp(&mut self, username: &str, amount: i64) -> Result<XpTotals> {
        let tx = self.conn.transaction()?;

        let current: Option<(i64, i64)> = tx
            .query_row(
                "SELECT xp, level FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (xp, level) = match current {
            Some((xp, level)) => {
                let (xp, level) = accumulate(xp, level, amount);
                tx.execute(
                    "UPDATE users SET xp = ?1, level = ?2 WHERE username = ?3",
                    params![xp, level, username],
                )?;
                (xp, level)
            }
            None => {
                debug!("Creating account for {} on first XP award", username);
                let (xp, level) = accumulate(0, STARTING_LEVEL, amount);
                Self::insert_user(&tx, username, xp, level)?;
                (xp, level)
            }
        };

        tx.execute(
            "INSERT INTO exp_log (username, amount, created_at) VALUES (?1, ?2, ?3)",
            params![username, amount, now_millis()],
        )?;
        tx.commit()?;

        Ok(XpTotals { xp, level })
    }

    /// Fetch a user's counters, creating a zeroed account if absent.
    ///
    /// The flag is `true` when the account was created by this call.
    pub fn get_or_create_xp(&mut self, username: &str) -> Result<(User, bool)> {
        let tx = self.conn.transaction()?;
        let result = match Self::find_user(&tx, username)? {
            Some(user) => (user, false),
            None => (Self::insert_user(&tx, username, 0, STARTING_LEVEL)?, true),
        };
        tx.commit()?;
        Ok(result)
    }

    /// Get a user by name without creating it
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT username, xp, level, streak, last_login FROM users WHERE username = ?1",
                params![username],
                |row| Self::row_to_user(row),
            )
            .optional()?;
        Ok(user)
    }

    /// XP ledger of a user, newest first
    pub fn get_exp_history(&self, username: &str) -> Result<Vec<ExpLogEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, username, amount, created_at
            FROM exp_log
            WHERE username = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok(ExpLogEntry {
                id: row.get(0)?,
                username: row.get(1)?,
                amount: row.get(2)?,
                created_at: to_datetime(row.get(3)?),
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn find_user(tx: &Transaction, username: &str) -> Result<Option<User>> {
        let user = tx
            .query_row(
                "SELECT username, xp, level, streak, last_login FROM users WHERE username = ?1",
                params![username],
                |row| Self::row_to_user(row),
            )
            .optional()?;
        Ok(user)
    }

    fn insert_user(tx: &Transaction, username: &str, xp: i64, level: i64) -> Result<User> {
        tx.execute(
            "INSERT INTO users (username, password, xp, level, streak) VALUES (?1, '', ?2, ?3, 0)",
            params![username, xp, level],
        )?;
        Ok(User {
            username: username.to_string(),
            xp,
            level,
            streak: 0,
            last_login: None,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            username: row.get(0)?,
            xp: row.get(1)?,
            level: row.get(2)?,
            streak: row.get(3)?,
            last_login: row.get::<_, Option<i64>>(4)?.map(to_datetime),
        })
    }
}
