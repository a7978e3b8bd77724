use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the database file, or `:memory:`.
    pub database_url: String,
    pub database_name: String,
    pub busy_timeout: Duration,
    pub recent_messages_limit: u16,
}

pub const IN_MEMORY_URL: &str = ":memory:";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        let busy_timeout = match env::var("DATABASE_BUSY_TIMEOUT") {
            Ok(raw) => humantime::parse_duration(&raw).map_err(|e| {
                anyhow::anyhow!("DATABASE_BUSY_TIMEOUT must be a duration like '5s': {}", e)
            })?,
            Err(_) => Duration::from_secs(5),
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "data".to_string()),
            database_name: env::var("DATABASE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "ratekeeper".to_string()),
            busy_timeout,
            recent_messages_limit: env::var("RECENT_MESSAGES_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
        })
    }

    pub fn in_memory() -> Self {
        Config {
            database_url: IN_MEMORY_URL.to_string(),
            database_name: "test".to_string(),
            busy_timeout: Duration::from_secs(5),
            recent_messages_limit: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_logic() {
        // 1. Test defaults
        env::remove_var("DATABASE_URL");
        env::remove_var("DATABASE_NAME");
        env::remove_var("DATABASE_BUSY_TIMEOUT");
        env::remove_var("RECENT_MESSAGES_LIMIT");
        let config = Config::build().unwrap();
        assert_eq!(config.database_url, "data");
        assert_eq!(config.database_name, "ratekeeper");
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert_eq!(config.recent_messages_limit, 20);

        // 2. Test overrides
        env::set_var("DATABASE_NAME", "moderation");
        env::set_var("DATABASE_BUSY_TIMEOUT", "250ms");
        env::set_var("RECENT_MESSAGES_LIMIT", "not-a-number");
        let config = Config::build().unwrap();
        assert_eq!(config.database_name, "moderation");
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.recent_messages_limit, 20);

        // 3. Test invalid duration
        env::set_var("DATABASE_BUSY_TIMEOUT", "soon");
        assert!(Config::build().is_err());

        // Cleanup
        env::remove_var("DATABASE_NAME");
        env::remove_var("DATABASE_BUSY_TIMEOUT");
        env::remove_var("RECENT_MESSAGES_LIMIT");
    }
}
