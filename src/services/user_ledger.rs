use crate::db::Database;
use crate::error::StoreError;
use crate::models::{ScoreResult, UserRecord};
use tracing::error;

/// Per-user activity and vote counters.
#[derive(Clone)]
pub struct UserLedger {
    db: Database,
}

impl UserLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn record_activity(
        &self,
        uid: i64,
        username: &str,
        alt_username: &str,
    ) -> Result<(), StoreError> {
        let username = username.to_string();
        let alt_username = alt_username.to_string();
        self.db
            .run_blocking(move |db| db.record_activity(uid, &username, &alt_username))
            .await
            .inspect_err(|e| error!("Upsert of user counter for {} failed: {}", uid, e))
    }

    pub async fn record_vote(&self, uid: i64, amount: i64) -> Result<(), StoreError> {
        self.db
            .run_blocking(move |db| db.record_vote(uid, amount))
            .await
            .inspect_err(|e| error!("Upsert of vote for {} failed: {}", uid, e))
    }

    pub async fn get_rating_by_uid(&self, uid: i64) -> Result<ScoreResult, StoreError> {
        self.db
            .run_blocking(move |db| db.get_rating_by_uid(uid))
            .await
    }

    pub async fn get_rating_by_username(&self, username: &str) -> Result<ScoreResult, StoreError> {
        let username = username.to_string();
        self.db
            .run_blocking(move |db| db.get_rating_by_username(&username))
            .await
    }

    pub async fn get_user(&self, uid: i64) -> Result<UserRecord, StoreError> {
        self.db.run_blocking(move |db| db.get_user(uid)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn ledger() -> UserLedger {
        UserLedger::new(Database::new(&Config::in_memory()).unwrap())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_activity_is_not_lost() {
        let ledger = ledger();
        let mut handles = Vec::new();
        for i in 0..50 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .record_activity(77, "Racer", &format!("racer-{}", i))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = ledger.get_user(77).await.unwrap();
        assert_eq!(user.counter, 50);
        assert_eq!(user.username, "racer");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_votes_are_not_lost() {
        let ledger = ledger();
        let mut handles = Vec::new();
        // 40 upvotes and 20 downvotes, interleaved
        for i in 0..60 {
            let ledger = ledger.clone();
            let amount = if i % 3 == 2 { -1 } else { 1 };
            handles.push(tokio::spawn(async move { ledger.record_vote(88, amount).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let user = ledger.get_user(88).await.unwrap();
        assert_eq!(user.vote_counter, 20);
        assert_eq!(user.counter, 0);
    }

    #[tokio::test]
    async fn test_votes_and_rating() {
        let ledger = ledger();
        for _ in 0..5 {
            ledger.record_activity(3, "erin", "Erin").await.unwrap();
        }
        ledger.record_vote(3, 3).await.unwrap();
        ledger.record_vote(3, -1).await.unwrap();

        assert_eq!(ledger.get_user(3).await.unwrap().vote_counter, 2);
        assert_eq!(ledger.get_rating_by_uid(3).await.unwrap().rating, 25);
        assert_eq!(ledger.get_rating_by_username("ERIN").await.unwrap().user_id, 3);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let ledger = ledger();
        assert!(ledger.get_user(1).await.unwrap_err().is_not_found());
        assert!(ledger.get_rating_by_uid(1).await.unwrap_err().is_not_found());
        assert!(ledger
            .get_rating_by_username("ghost")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
