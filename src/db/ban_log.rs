use rusqlite::params;
use tracing::debug;

use super::Database;
use crate::error::StoreError;
use crate::models::BanRecord;

impl Database {
    pub fn push_ban_log(
        &self,
        uid: i64,
        user_info: &str,
        moderator_id: i64,
        created_at: &str,
    ) -> Result<i64, StoreError> {
        debug!("Database: Logging ban of user {} by {}", uid, moderator_id);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO ban_log (uid, user_info, moderator_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![uid, user_info, moderator_id, created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_bans_for_user(&self, uid: i64, limit: usize) -> Result<Vec<BanRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, uid, user_info, moderator_id, created_at FROM ban_log
             WHERE uid = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![uid, limit], |row| {
            Ok(BanRecord {
                id: row.get(0)?,
                uid: row.get(1)?,
                user_info: row.get(2)?,
                moderator_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}
