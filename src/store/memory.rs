use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{StoreError, VotingStore};
use crate::models::dish::{Dish, DishWithVotes};
use crate::models::event::EventType;
use crate::models::user::{UserAccount, UserRole};
use crate::models::vote::Vote;

/// In-memory store enforcing the same constraints the schema does. Backs
/// the test suites and the `STORE=memory` demo mode; everything is lost
/// on restart.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    dishes: Vec<Dish>,
    votes: Vec<Vote>,
    users: HashMap<i64, UserAccount>,
    roles: HashMap<i64, UserRole>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VotingStore for MemStore {
    async fn dishes_with_votes(&self, party: EventType) -> Result<Vec<DishWithVotes>, StoreError> {
        let inner = self.lock();
        let mut out: Vec<DishWithVotes> = inner
            .dishes
            .iter()
            .filter(|d| d.party_type == party)
            .map(|d| {
                let votes = inner.votes.iter().filter(|v| v.dish_id == d.id).count() as i64;
                DishWithVotes::from_dish(d, votes)
            })
            .collect();
        out.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn insert_dish(
        &self,
        name: &str,
        party: EventType,
        user_id: i64,
    ) -> Result<Dish, StoreError> {
        let mut inner = self.lock();
        let taken = inner
            .dishes
            .iter()
            .any(|d| d.party_type == party && d.name.to_lowercase() == name.to_lowercase());
        if taken {
            return Err(StoreError::UniqueViolation);
        }
        let dish = Dish {
            id: inner.next_id(),
            name: name.to_string(),
            party_type: party,
            user_id,
            created_at: Utc::now(),
        };
        inner.dishes.push(dish.clone());
        Ok(dish)
    }

    async fn insert_vote(&self, dish_id: i64, user_id: i64) -> Result<Vote, StoreError> {
        let mut inner = self.lock();
        if !inner.dishes.iter().any(|d| d.id == dish_id) {
            return Err(StoreError::NotFound);
        }
        if inner
            .votes
            .iter()
            .any(|v| v.dish_id == dish_id && v.user_id == user_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let vote = Vote {
            id: inner.next_id(),
            dish_id,
            user_id,
            created_at: Utc::now(),
        };
        inner.votes.push(vote.clone());
        Ok(vote)
    }

    async fn voted_dish_ids(
        &self,
        user_id: i64,
        party: EventType,
    ) -> Result<Vec<i64>, StoreError> {
        let inner = self.lock();
        let mut ids: Vec<i64> = inner
            .votes
            .iter()
            .filter(|v| v.user_id == user_id)
            .filter(|v| {
                inner
                    .dishes
                    .iter()
                    .any(|d| d.id == v.dish_id && d.party_type == party)
            })
            .map(|v| v.dish_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn delete_dishes_for_party(&self, party: EventType) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let removed: Vec<i64> = inner
            .dishes
            .iter()
            .filter(|d| d.party_type == party)
            .map(|d| d.id)
            .collect();
        inner.dishes.retain(|d| d.party_type != party);
        inner.votes.retain(|v| !removed.contains(&v.dish_id));
        Ok(removed.len() as u64)
    }

    async fn create_anonymous_user(&self) -> Result<UserAccount, StoreError> {
        let mut inner = self.lock();
        let account = UserAccount {
            id: inner.next_id(),
            email: None,
            password_hash: None,
            is_anonymous: true,
            created_at: Utc::now(),
        };
        inner.users.insert(account.id, account.clone());
        Ok(account)
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserAccount, StoreError> {
        let mut inner = self.lock();
        if inner
            .users
            .values()
            .any(|u| u.email.as_deref() == Some(email))
        {
            return Err(StoreError::UniqueViolation);
        }
        let account = UserAccount {
            id: inner.next_id(),
            email: Some(email.to_string()),
            password_hash: Some(password_hash.to_string()),
            is_anonymous: false,
            created_at: Utc::now(),
        };
        inner.users.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .users
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn user_role(&self, user_id: i64) -> Result<UserRole, StoreError> {
        let inner = self.lock();
        Ok(inner.roles.get(&user_id).copied().unwrap_or(UserRole::User))
    }

    async fn grant_admin(&self, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.roles.insert(user_id, UserRole::Admin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dish_names_unique_per_party_case_insensitive() {
        let store = MemStore::new();
        let user = store.create_anonymous_user().await.unwrap();

        store
            .insert_dish("Peru Assado", EventType::Natal, user.id)
            .await
            .unwrap();
        let dup = store
            .insert_dish("peru assado", EventType::Natal, user.id)
            .await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation)));

        // Same name on the other party is fine.
        store
            .insert_dish("Peru Assado", EventType::Reveillon, user.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_one_vote_per_user_per_dish() {
        let store = MemStore::new();
        let user = store.create_anonymous_user().await.unwrap();
        let dish = store
            .insert_dish("Bacalhoada", EventType::Natal, user.id)
            .await
            .unwrap();

        store.insert_vote(dish.id, user.id).await.unwrap();
        let again = store.insert_vote(dish.id, user.id).await;
        assert!(matches!(again, Err(StoreError::UniqueViolation)));

        let other = store.create_anonymous_user().await.unwrap();
        store.insert_vote(dish.id, other.id).await.unwrap();

        let tallied = store.dishes_with_votes(EventType::Natal).await.unwrap();
        assert_eq!(tallied[0].votes, 2);
    }

    #[tokio::test]
    async fn test_vote_for_missing_dish_is_not_found() {
        let store = MemStore::new();
        let user = store.create_anonymous_user().await.unwrap();
        let result = store.insert_vote(999, user.id).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_party_cascades_votes() {
        let store = MemStore::new();
        let user = store.create_anonymous_user().await.unwrap();
        let natal = store
            .insert_dish("Peru", EventType::Natal, user.id)
            .await
            .unwrap();
        let reveillon = store
            .insert_dish("Lentilha", EventType::Reveillon, user.id)
            .await
            .unwrap();
        store.insert_vote(natal.id, user.id).await.unwrap();
        store.insert_vote(reveillon.id, user.id).await.unwrap();

        let removed = store
            .delete_dishes_for_party(EventType::Natal)
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store
            .dishes_with_votes(EventType::Natal)
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .voted_dish_ids(user.id, EventType::Natal)
            .await
            .unwrap()
            .is_empty());

        // The other party is untouched.
        assert_eq!(
            store.voted_dish_ids(user.id, EventType::Reveillon).await.unwrap(),
            vec![reveillon.id]
        );
    }

    #[tokio::test]
    async fn test_voted_ids_are_scoped_to_party() {
        let store = MemStore::new();
        let user = store.create_anonymous_user().await.unwrap();
        let natal = store
            .insert_dish("Farofa", EventType::Natal, user.id)
            .await
            .unwrap();
        let reveillon = store
            .insert_dish("Pudim", EventType::Reveillon, user.id)
            .await
            .unwrap();
        store.insert_vote(natal.id, user.id).await.unwrap();
        store.insert_vote(reveillon.id, user.id).await.unwrap();

        assert_eq!(
            store.voted_dish_ids(user.id, EventType::Natal).await.unwrap(),
            vec![natal.id]
        );
    }

    #[tokio::test]
    async fn test_emails_are_unique() {
        let store = MemStore::new();
        store.create_user("ana@test.com", "hash").await.unwrap();
        let dup = store.create_user("ana@test.com", "hash2").await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation)));
    }

    #[tokio::test]
    async fn test_role_defaults_to_user_until_granted() {
        let store = MemStore::new();
        let account = store.create_user("chef@test.com", "hash").await.unwrap();
        assert_eq!(store.user_role(account.id).await.unwrap(), UserRole::User);

        store.grant_admin(account.id).await.unwrap();
        assert_eq!(store.user_role(account.id).await.unwrap(), UserRole::Admin);
    }
}
