use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, VotingStore};
use crate::models::dish::{Dish, DishWithVotes};
use crate::models::event::EventType;
use crate::models::user::{UserAccount, UserRole};
use crate::models::vote::Vote;

/// PostgreSQL-backed store. Uniqueness lives in the schema: dish names per
/// party via the `dishes_party_lower_name_key` index, votes via the
/// `(dish_id, user_id)` constraint, emails via `users.email`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translate driver errors into the store taxonomy. 23505 is PostgreSQL's
/// unique_violation, 23503 foreign_key_violation (a vote referencing a
/// dish that is gone).
fn map_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            Some("23505") => return StoreError::UniqueViolation,
            Some("23503") => return StoreError::NotFound,
            _ => {}
        }
    }
    if matches!(e, sqlx::Error::RowNotFound) {
        return StoreError::NotFound;
    }
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl VotingStore for PgStore {
    async fn dishes_with_votes(&self, party: EventType) -> Result<Vec<DishWithVotes>, StoreError> {
        sqlx::query_as::<_, DishWithVotes>(
            "SELECT id, name, party_type, user_id, created_at, votes \
             FROM dishes_with_votes \
             WHERE party_type = $1 \
             ORDER BY votes DESC, name ASC",
        )
        .bind(party)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_dish(
        &self,
        name: &str,
        party: EventType,
        user_id: i64,
    ) -> Result<Dish, StoreError> {
        sqlx::query_as::<_, Dish>(
            "INSERT INTO dishes (name, party_type, user_id) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, party_type, user_id, created_at",
        )
        .bind(name)
        .bind(party)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn insert_vote(&self, dish_id: i64, user_id: i64) -> Result<Vote, StoreError> {
        sqlx::query_as::<_, Vote>(
            "INSERT INTO votes (dish_id, user_id) \
             VALUES ($1, $2) \
             RETURNING id, dish_id, user_id, created_at",
        )
        .bind(dish_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn voted_dish_ids(
        &self,
        user_id: i64,
        party: EventType,
    ) -> Result<Vec<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT v.dish_id \
             FROM votes v \
             JOIN dishes d ON d.id = v.dish_id \
             WHERE v.user_id = $1 AND d.party_type = $2 \
             ORDER BY v.dish_id",
        )
        .bind(user_id)
        .bind(party)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn delete_dishes_for_party(&self, party: EventType) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM dishes WHERE party_type = $1")
            .bind(party)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected())
    }

    async fn create_anonymous_user(&self) -> Result<UserAccount, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO users DEFAULT VALUES \
             RETURNING id, email, password_hash, is_anonymous, created_at",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserAccount, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            "INSERT INTO users (email, password_hash, is_anonymous) \
             VALUES ($1, $2, FALSE) \
             RETURNING id, email, password_hash, is_anonymous, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        sqlx::query_as::<_, UserAccount>(
            "SELECT id, email, password_hash, is_anonymous, created_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn user_role(&self, user_id: i64) -> Result<UserRole, StoreError> {
        let role = sqlx::query_scalar::<_, UserRole>(
            "SELECT role FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(role.unwrap_or(UserRole::User))
    }

    async fn grant_admin(&self, user_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, 'admin') \
             ON CONFLICT (user_id) DO UPDATE SET role = 'admin'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }
}
