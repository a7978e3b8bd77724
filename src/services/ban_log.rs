use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::db::Database;
use crate::error::StoreError;
use crate::models::BanRecord;

/// Receives moderation ban events for auditing.
#[async_trait]
pub trait BanSink: Send + Sync {
    async fn record_ban(&self, uid: i64, user_info: &str, moderator_id: i64)
        -> Result<(), StoreError>;
}

/// Store-backed ban audit log.
#[derive(Clone)]
pub struct BanLog {
    db: Database,
}

impl BanLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Newest first.
    pub async fn bans_for_user(&self, uid: i64, limit: usize) -> Result<Vec<BanRecord>, StoreError> {
        self.db
            .run_blocking(move |db| db.list_bans_for_user(uid, limit))
            .await
    }
}

#[async_trait]
impl BanSink for BanLog {
    async fn record_ban(
        &self,
        uid: i64,
        user_info: &str,
        moderator_id: i64,
    ) -> Result<(), StoreError> {
        let user_info = user_info.to_string();
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let id = self
            .db
            .run_blocking(move |db| db.push_ban_log(uid, &user_info, moderator_id, &created_at))
            .await
            .inspect_err(|e| error!("Can't log ban of user {}: {}", uid, e))?;
        info!("Ban #{} logged: user {} by moderator {}", id, uid, moderator_id);
        Ok(())
    }
}
