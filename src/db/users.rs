use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::Database;
use crate::error::StoreError;
use crate::models::{ScoreResult, UserRecord};

const USER_COLUMNS: &str = "uid, counter, vote_counter, username, alt_username, activity_seq";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        uid: row.get(0)?,
        counter: row.get(1)?,
        vote_counter: row.get(2)?,
        username: row.get(3)?,
        alt_username: row.get(4)?,
        activity_seq: row.get(5)?,
    })
}

impl Database {
    /// Counts one message for `uid`, creating the record on first sight.
    /// An empty `username` keeps the stored one; `alt_username` is always
    /// overwritten.
    pub fn record_activity(
        &self,
        uid: i64,
        username: &str,
        alt_username: &str,
    ) -> Result<(), StoreError> {
        debug!("Database: Recording activity for user {}", uid);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (uid, counter, username, alt_username, activity_seq)
             VALUES (?1, 1, ?2, ?3, (SELECT COALESCE(MAX(activity_seq), 0) + 1 FROM users))
             ON CONFLICT(uid) DO UPDATE SET
                counter = counter + 1,
                username = CASE WHEN excluded.username = '' THEN username ELSE excluded.username END,
                alt_username = excluded.alt_username,
                activity_seq = excluded.activity_seq",
            params![uid, username.to_lowercase(), alt_username],
        )?;
        Ok(())
    }

    /// Adds `amount` (possibly negative) to the vote counter of `uid`.
    pub fn record_vote(&self, uid: i64, amount: i64) -> Result<(), StoreError> {
        debug!("Database: Recording vote {:+} for user {}", amount, uid);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (uid, vote_counter) VALUES (?1, ?2)
             ON CONFLICT(uid) DO UPDATE SET vote_counter = vote_counter + excluded.vote_counter",
            params![uid, amount],
        )?;
        Ok(())
    }

    pub fn get_user(&self, uid: i64) -> Result<UserRecord, StoreError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM users WHERE uid = ?1", USER_COLUMNS);
        conn.query_row(&sql, [uid], user_from_row)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", uid)))
    }

    pub fn get_rating_by_uid(&self, uid: i64) -> Result<ScoreResult, StoreError> {
        let user = self.get_user(uid)?;
        Ok(ScoreResult::from(&user))
    }

    /// Case-insensitive lookup. When several users share the name, the most
    /// recently active one wins.
    pub fn get_rating_by_username(&self, username: &str) -> Result<ScoreResult, StoreError> {
        let username = username.to_lowercase();
        if username.is_empty() {
            return Err(StoreError::NotFound("empty username".to_string()));
        }

        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM users WHERE username = ?1
             ORDER BY activity_seq DESC, id DESC LIMIT 1",
            USER_COLUMNS
        );
        let user = conn
            .query_row(&sql, [&username], user_from_row)
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("username '{}'", username)))?;
        Ok(ScoreResult::from(&user))
    }
}
