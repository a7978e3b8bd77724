use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Config, IN_MEMORY_URL};
use crate::error::StoreError;

mod ban_log;
mod messages;
pub mod schema;
mod settings;
mod users;

pub use settings::SettingsLoad;

/// Shared handle to the backing store. Cloning is cheap; every clone talks
/// to the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        Self::connect(
            &config.database_url,
            &config.database_name,
            config.busy_timeout,
        )
    }

    /// Opens the store, applies the schema and verifies liveness before
    /// returning.
    pub fn connect(url: &str, name: &str, busy_timeout: Duration) -> Result<Self, StoreError> {
        let conn = if url == IN_MEMORY_URL {
            Connection::open_in_memory()?
        } else {
            let dir = Path::new(url);
            std::fs::create_dir_all(dir).map_err(|e| {
                StoreError::Config(format!("cannot create {}: {}", dir.display(), e))
            })?;
            let conn = Connection::open(dir.join(format!("{}.db", name)))?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn
        };
        conn.busy_timeout(busy_timeout)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.execute_init()?;
        db.ping()?;
        info!("Database: connected to '{}' at {}", name, url);
        Ok(db)
    }

    pub fn execute_init(&self) -> Result<(), StoreError> {
        debug!("Database: Initializing schema...");
        let conn = self.lock()?;
        conn.execute_batch(schema::SCHEMA)?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    pub fn ping(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        if one != 1 {
            return Err(StoreError::Decode(format!("ping returned {}", one)));
        }
        Ok(())
    }

    /// Releases this handle. The connection itself is closed once the last
    /// clone is gone.
    pub fn close(self) -> Result<(), StoreError> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex
                    .into_inner()
                    .map_err(|e| StoreError::Task(format!("DB lock poisoned: {}", e)))?;
                conn.close().map_err(|(_, e)| StoreError::Unavailable(e))?;
                info!("Database: connection closed");
            }
            Err(_) => debug!("Database: handle released, connection still shared"),
        }
        Ok(())
    }

    /// Runs a synchronous store call on the blocking pool. Dropping the
    /// returned future abandons the result but not a statement already
    /// executing.
    pub async fn run_blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StoreError::Task(format!("DB task join error: {}", e)))?
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Task(format!("DB lock poisoned: {}", e)))
    }
}
