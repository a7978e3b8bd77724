pub mod ban_log;
pub mod message_ledger;
pub mod settings;
pub mod user_ledger;

pub use ban_log::{BanLog, BanSink};
pub use message_ledger::MessageLedger;
pub use settings::{SettingsCache, SharedSettings};
pub use user_ledger::UserLedger;
