//! Persistence and identity boundary. Handlers and the voting session only
//! ever see [`VotingStore`]; PostgreSQL backs it in production and
//! [`memory::MemStore`] backs it in tests and demo mode.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::models::dish::{Dish, DishWithVotes};
use crate::models::event::EventType;
use crate::models::user::{UserAccount, UserRole};
use crate::models::vote::Vote;

/// Failure modes a store reports. Raw backend shapes (SQLSTATEs, driver
/// errors) are translated here at the boundary and never leak upward.
#[derive(Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write: dish name per party,
    /// one vote per user per dish, or account email.
    UniqueViolation,
    /// The operation referenced a row that does not exist.
    NotFound,
    /// Anything else the backend reported, surfaced verbatim.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation => write!(f, "unique constraint violated"),
            StoreError::NotFound => write!(f, "row not found"),
            StoreError::Unavailable(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Everything the voting app needs from its backend: dishes, votes and
/// accounts. One implementation per backend; callers hold `Arc<dyn
/// VotingStore>` and never learn which one they got.
#[async_trait]
pub trait VotingStore: Send + Sync {
    /// Dishes of one party with their derived vote counts.
    async fn dishes_with_votes(&self, party: EventType) -> Result<Vec<DishWithVotes>, StoreError>;

    /// Insert a dish. Fails with [`StoreError::UniqueViolation`] when the
    /// party already has a dish of that name (case-insensitively).
    async fn insert_dish(
        &self,
        name: &str,
        party: EventType,
        user_id: i64,
    ) -> Result<Dish, StoreError>;

    /// Record a vote. Fails with [`StoreError::UniqueViolation`] when the
    /// user already voted for the dish, [`StoreError::NotFound`] when the
    /// dish does not exist.
    async fn insert_vote(&self, dish_id: i64, user_id: i64) -> Result<Vote, StoreError>;

    /// Ids of the dishes in `party` the user has already voted for.
    async fn voted_dish_ids(&self, user_id: i64, party: EventType)
    -> Result<Vec<i64>, StoreError>;

    /// Delete every dish of the party; their votes go with them. Returns
    /// the number of dishes removed.
    async fn delete_dishes_for_party(&self, party: EventType) -> Result<u64, StoreError>;

    /// Create an account with no credentials, used for first-contact
    /// visitors.
    async fn create_anonymous_user(&self) -> Result<UserAccount, StoreError>;

    /// Create a credentialed account. Fails with
    /// [`StoreError::UniqueViolation`] when the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str)
    -> Result<UserAccount, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Role for an account; accounts without a role row are plain users.
    async fn user_role(&self, user_id: i64) -> Result<UserRole, StoreError>;

    /// Grant the admin role, upserting the role row.
    async fn grant_admin(&self, user_id: i64) -> Result<(), StoreError>;
}
