use rusqlite::{params, Row};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::Database;
use crate::error::StoreError;
use crate::models::DynamicSetting;

/// Outcome of a full settings scan.
#[derive(Debug, Default)]
pub struct SettingsLoad {
    pub settings: HashMap<i64, DynamicSetting>,
    /// Rows that failed to decode and were left out.
    pub skipped: usize,
}

fn setting_from_row(row: &Row<'_>) -> Result<DynamicSetting, StoreError> {
    let recipients: String = row.get(2)?;
    Ok(DynamicSetting {
        chat_id: row.get(0)?,
        pause: row.get(1)?,
        log_recipients: serde_json::from_str(&recipients)?,
    })
}

impl Database {
    /// Reads every chat's settings. A row that fails to decode is logged
    /// and skipped; only failing to start the scan is an error.
    pub fn load_all_settings(&self) -> Result<SettingsLoad, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT chat_id, pause, log_recipients FROM settings")?;
        let mut rows = stmt.query([])?;

        let mut load = SettingsLoad::default();
        while let Some(row) = rows.next()? {
            match setting_from_row(row) {
                Ok(setting) => {
                    load.settings.insert(setting.chat_id, setting);
                }
                Err(e) => {
                    let chat_id = row.get::<_, i64>(0).ok();
                    warn!("Database: Skipping settings row for chat {:?}: {}", chat_id, e);
                    load.skipped += 1;
                }
            }
        }

        debug!(
            "Database: Loaded {} chat settings ({} skipped)",
            load.settings.len(),
            load.skipped
        );
        Ok(load)
    }

    /// Replaces the whole settings row for `chat_id`. The key comes from
    /// the argument, not from `settings.chat_id`.
    pub fn write_settings(&self, chat_id: i64, settings: &DynamicSetting) -> Result<(), StoreError> {
        debug!("Database: Writing settings for chat {}", chat_id);
        let recipients = serde_json::to_string(&settings.log_recipients)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO settings (chat_id, pause, log_recipients) VALUES (?1, ?2, ?3)
             ON CONFLICT(chat_id) DO UPDATE SET
                pause = excluded.pause,
                log_recipients = excluded.log_recipients",
            params![chat_id, settings.pause, recipients],
        )?;
        Ok(())
    }
}
