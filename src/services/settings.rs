//! In-memory view of per-chat settings.
//!
//! The cache is filled by a full scan and kept current by writing through
//! it. Writes made by other processes (or directly against the store) are
//! not seen until the next `refresh`.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::db::Database;
use crate::error::StoreError;
use crate::models::DynamicSetting;

/// The cache does no locking of its own; share it behind this.
pub type SharedSettings = Arc<RwLock<SettingsCache>>;

pub struct SettingsCache {
    db: Database,
    settings: HashMap<i64, DynamicSetting>,
}

impl SettingsCache {
    /// Bulk-loads every chat's settings. Undecodable rows are skipped; an
    /// error means the scan itself could not run.
    pub async fn load(db: Database) -> Result<Self, StoreError> {
        let mut cache = Self {
            db,
            settings: HashMap::new(),
        };
        cache.refresh().await?;
        Ok(cache)
    }

    pub fn into_shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }

    /// Replaces the whole map with a fresh scan of the store.
    pub async fn refresh(&mut self) -> Result<usize, StoreError> {
        let load = self
            .db
            .run_blocking(|db| db.load_all_settings())
            .await
            .inspect_err(|e| error!("Can't read chat settings: {}", e))?;
        info!(
            "Loaded settings for {} chats ({} rows skipped)",
            load.settings.len(),
            load.skipped
        );
        self.settings = load.settings;
        Ok(load.skipped)
    }

    /// Writes to the store, then to the map. The map is left untouched if
    /// the store write fails.
    pub async fn write(&mut self, chat_id: i64, settings: DynamicSetting) -> Result<(), StoreError> {
        let stored = DynamicSetting { chat_id, ..settings };
        let to_store = stored.clone();
        self.db
            .run_blocking(move |db| db.write_settings(chat_id, &to_store))
            .await
            .inspect_err(|e| error!("Upsert of the chat {} settings failed: {}", chat_id, e))?;
        self.settings.insert(chat_id, stored);
        Ok(())
    }

    pub fn get(&self, chat_id: i64) -> Option<&DynamicSetting> {
        self.settings.get(&chat_id)
    }

    /// Chats without settings are not paused.
    pub fn is_paused(&self, chat_id: i64) -> bool {
        self.get(chat_id).map_or(false, |s| s.pause)
    }

    pub fn log_recipients(&self, chat_id: i64) -> &[i64] {
        self.get(chat_id)
            .map(|s| s.log_recipients.as_slice())
            .unwrap_or(&[])
    }

    pub fn as_map(&self) -> &HashMap<i64, DynamicSetting> {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}
