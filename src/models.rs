use serde::{Deserialize, Serialize};

/// Weight of one vote, in activity-counter units.
pub const VOTE_RATING_MULTIPLY: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: i64,
    pub counter: u32,
    pub vote_counter: i64,
    /// Lower-cased, last seen.
    pub username: String,
    /// Case-preserved display alias, last seen.
    pub alt_username: String,
    pub activity_seq: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub text: String,
    pub date: u64,
}

/// Derived rating, recomputed on every read and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub rating: i64,
    pub user_id: i64,
}

impl ScoreResult {
    /// Vote totals are unbounded, so the rating saturates at the i64 range.
    pub fn from_counts(user_id: i64, counter: u32, vote_counter: i64) -> Self {
        Self {
            rating: vote_counter
                .saturating_mul(VOTE_RATING_MULTIPLY)
                .saturating_add(i64::from(counter)),
            user_id,
        }
    }
}

impl From<&UserRecord> for ScoreResult {
    fn from(user: &UserRecord) -> Self {
        Self::from_counts(user.uid, user.counter, user.vote_counter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSetting {
    pub chat_id: i64,
    pub pause: bool,
    pub log_recipients: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRecord {
    pub id: i64,
    pub uid: i64,
    pub user_info: String,
    pub moderator_id: i64,
    pub created_at: String,
}
