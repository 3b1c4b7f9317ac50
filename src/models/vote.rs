use chrono::{DateTime, Utc};
use serde::Serialize;

/// One user's vote for one dish. The store enforces the
/// `(dish_id, user_id)` uniqueness; votes are only ever removed
/// transitively when their dish is deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub dish_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
