use crate::db::Database;
use crate::error::StoreError;
use crate::models::{ChatMessage, ScoreResult};
use tracing::{debug, error};

/// Append-only chat message log, joined to the user ledger for ratings.
#[derive(Clone)]
pub struct MessageLedger {
    db: Database,
}

impl MessageLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn save_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        let (chat_id, message_id) = (message.chat_id, message.message_id);
        self.db
            .run_blocking(move |db| db.save_message(&message))
            .await
            .inspect_err(|e| {
                error!(
                    "Can't insert message {} in chat {}: {}",
                    message_id, chat_id, e
                )
            })
    }

    pub async fn get_message_info(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<ChatMessage, StoreError> {
        self.db
            .run_blocking(move |db| db.get_message_info(chat_id, message_id))
            .await
    }

    pub async fn get_rating_for_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<ScoreResult, StoreError> {
        let score = self
            .db
            .run_blocking(move |db| db.get_rating_for_message(chat_id, message_id))
            .await?;
        debug!("Get rating {} for user {}", score.rating, score.user_id);
        Ok(score)
    }

    pub async fn get_recent_messages(
        &self,
        user_id: i64,
        chat_id: i64,
        limit: u16,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        self.db
            .run_blocking(move |db| db.get_recent_messages(user_id, chat_id, limit))
            .await
    }
}
