pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use error::StoreError;

/// Every store-backed component, sharing one connection
pub struct Data {
    pub config: config::Config,
    pub db: db::Database,
    pub users: services::UserLedger,
    pub messages: services::MessageLedger,
    pub settings: services::SharedSettings,
    pub bans: services::BanLog,
}

impl Data {
    /// Connects and loads the settings cache.
    pub async fn open(config: config::Config) -> Result<Self, StoreError> {
        let db = db::Database::new(&config)?;
        let settings = services::SettingsCache::load(db.clone()).await?.into_shared();

        Ok(Self {
            users: services::UserLedger::new(db.clone()),
            messages: services::MessageLedger::new(db.clone()),
            bans: services::BanLog::new(db.clone()),
            settings,
            db,
            config,
        })
    }

    pub fn close(self) -> Result<(), StoreError> {
        let Data {
            db,
            users,
            messages,
            settings,
            bans,
            ..
        } = self;
        drop((users, messages, settings, bans));
        db.close()
    }
}
