use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::Database;
use crate::error::StoreError;
use crate::models::{ChatMessage, ScoreResult};

const MESSAGE_COLUMNS: &str = "message_id, chat_id, user_id, user_name, text, date";

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    let date: i64 = row.get(5)?;
    Ok(ChatMessage {
        message_id: row.get(0)?,
        chat_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        text: row.get(4)?,
        date: u64::try_from(date)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?,
    })
}

impl Database {
    /// Appends a message. Duplicate (chat, message) pairs are accepted.
    pub fn save_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        debug!(
            "Database: Saving message {} from user {} in chat {}",
            message.message_id, message.user_id, message.chat_id
        );
        let date = i64::try_from(message.date)
            .map_err(|_| StoreError::Decode(format!("message date {} out of range", message.date)))?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO messages (chat_id, message_id, user_id, user_name, text, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.chat_id,
                message.message_id,
                message.user_id,
                message.user_name,
                message.text,
                date
            ],
        )?;
        Ok(())
    }

    /// Point lookup; among duplicates the latest insert wins.
    pub fn get_message_info(&self, chat_id: i64, message_id: i64) -> Result<ChatMessage, StoreError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM messages WHERE chat_id = ?1 AND message_id = ?2
             ORDER BY id DESC LIMIT 1",
            MESSAGE_COLUMNS
        );
        conn.query_row(&sql, params![chat_id, message_id], message_from_row)
            .optional()?
            .ok_or_else(|| {
                StoreError::NotFound(format!("message {} in chat {}", message_id, chat_id))
            })
    }

    /// Rates the author of a message. An author without a user record
    /// contributes zero rather than failing the lookup.
    pub fn get_rating_for_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<ScoreResult, StoreError> {
        let conn = self.lock()?;
        let score = conn
            .query_row(
                "SELECT m.user_id, COALESCE(u.counter, 0), COALESCE(u.vote_counter, 0)
                 FROM messages m
                 LEFT JOIN users u ON u.uid = m.user_id
                 WHERE m.chat_id = ?1 AND m.message_id = ?2
                 ORDER BY m.id DESC LIMIT 1",
                params![chat_id, message_id],
                |row| Ok(ScoreResult::from_counts(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?
            .ok_or_else(|| {
                StoreError::NotFound(format!("message {} in chat {}", message_id, chat_id))
            })?;
        debug!(
            "Database: Rating {} for user {} (message {} in chat {})",
            score.rating, score.user_id, message_id, chat_id
        );
        Ok(score)
    }

    /// Up to `limit` messages by `user_id` in `chat_id`, newest insert
    /// first. Ordering follows write order, not the `date` field.
    pub fn get_recent_messages(
        &self,
        user_id: i64,
        chat_id: i64,
        limit: u16,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM messages WHERE user_id = ?1 AND chat_id = ?2
             ORDER BY id DESC LIMIT ?3",
            MESSAGE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, chat_id, i64::from(limit)], message_from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        debug!(
            "Database: {} recent messages for user {} in chat {}",
            results.len(),
            user_id,
            chat_id
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::db::Database;
    use crate::models::ChatMessage;

    fn test_db() -> Database {
        Database::new(&Config::in_memory()).unwrap()
    }

    fn msg(chat_id: i64, message_id: i64, user_id: i64, text: &str, date: u64) -> ChatMessage {
        ChatMessage {
            message_id,
            chat_id,
            user_id,
            user_name: format!("user{}", user_id),
            text: text.to_string(),
            date,
        }
    }

    #[test]
    fn test_save_and_lookup() {
        let db = test_db();
        let m = msg(-100, 1, 7, "hello", 1_600_000_000);
        db.save_message(&m).unwrap();

        assert_eq!(db.get_message_info(-100, 1).unwrap(), m);
        assert!(db.get_message_info(-100, 2).unwrap_err().is_not_found());
        assert!(db.get_message_info(-200, 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_messages_latest_wins() {
        let db = test_db();
        db.save_message(&msg(1, 1, 7, "first", 10)).unwrap();
        db.save_message(&msg(1, 1, 8, "second", 5)).unwrap();

        let found = db.get_message_info(1, 1).unwrap();
        assert_eq!(found.text, "second");
        assert_eq!(db.get_rating_for_message(1, 1).unwrap().user_id, 8);
    }

    #[test]
    fn test_rating_for_message_joins_author() {
        let db = test_db();
        for _ in 0..5 {
            db.record_activity(7, "dave", "Dave").unwrap();
        }
        db.record_vote(7, 2).unwrap();
        db.save_message(&msg(1, 42, 7, "rated", 1)).unwrap();

        let score = db.get_rating_for_message(1, 42).unwrap();
        assert_eq!(score.user_id, 7);
        assert_eq!(score.rating, 25);
    }

    #[test]
    fn test_rating_for_message_unknown_author_is_zero() {
        let db = test_db();
        db.save_message(&msg(1, 43, 99, "who am i", 1)).unwrap();

        let score = db.get_rating_for_message(1, 43).unwrap();
        assert_eq!(score.user_id, 99);
        assert_eq!(score.rating, 0);
    }

    #[test]
    fn test_rating_for_missing_message() {
        let db = test_db();
        db.record_activity(7, "dave", "Dave").unwrap();
        let err = db.get_rating_for_message(1, 404).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_recent_messages_newest_insert_first() {
        let db = test_db();
        // Dates deliberately out of order: retrieval follows insertion
        db.save_message(&msg(1, 1, 7, "m1", 300)).unwrap();
        db.save_message(&msg(1, 2, 7, "m2", 100)).unwrap();
        db.save_message(&msg(2, 3, 7, "other chat", 400)).unwrap();
        db.save_message(&msg(1, 4, 8, "other user", 500)).unwrap();
        db.save_message(&msg(1, 5, 7, "m3", 200)).unwrap();

        let recent = db.get_recent_messages(7, 1, 2).unwrap();
        let texts: Vec<_> = recent.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m3", "m2"]);

        let all = db.get_recent_messages(7, 1, 10).unwrap();
        assert_eq!(all.len(), 3);

        assert!(db.get_recent_messages(7, 1, 0).unwrap().is_empty());
        assert!(db.get_recent_messages(9, 1, 5).unwrap().is_empty());
    }

    #[test]
    fn test_rating_for_message_with_huge_vote_total() {
        let db = test_db();
        db.record_vote(1, i64::MAX / 5).unwrap();
        db.save_message(&msg(1, 1, 1, "big", 1)).unwrap();

        let score = db.get_rating_for_message(1, 1).unwrap();
        assert_eq!(score.rating, i64::MAX);
        assert_eq!(db.get_rating_by_uid(1).unwrap(), score);
    }

    #[test]
    fn test_corrupt_stored_date_is_decode_failure() {
        let db = test_db();
        {
            let conn = db.lock().unwrap();
            conn.execute(
                "INSERT INTO messages (chat_id, message_id, user_id, user_name, text, date)
                 VALUES (1, 1, 1, 'u', 'negative date', -5)",
                [],
            )
            .unwrap();
        }
        let err = db.get_message_info(1, 1).unwrap_err();
        assert!(matches!(err, crate::error::StoreError::Decode(_)));
    }

    #[test]
    fn test_message_date_out_of_range() {
        let db = test_db();
        let err = db.save_message(&msg(1, 1, 1, "far future", u64::MAX)).unwrap_err();
        assert!(matches!(err, crate::error::StoreError::Decode(_)));
    }
}
