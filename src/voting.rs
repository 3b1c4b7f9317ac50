//! Voting session controller: suggest, vote, reset and refresh for one
//! (party, user) pair, on top of whatever [`VotingStore`] was injected.

use std::collections::HashSet;
use std::sync::Arc;

use crate::auth::validate;
use crate::errors::AppError;
use crate::models::dish::{Dish, DishWithVotes};
use crate::models::event::EventType;
use crate::models::user::AuthUser;
use crate::models::vote::Vote;
use crate::store::{StoreError, VotingStore};
use crate::tally;

/// Everything a client needs to render one party: dishes in display
/// order, the winning set, and which dishes the current user voted for.
#[derive(Debug)]
pub struct EventView {
    pub dishes: Vec<DishWithVotes>,
    pub winner_ids: Vec<i64>,
    pub voted_dish_ids: Vec<i64>,
}

/// One user's voting session for one party.
///
/// Keeps a local set of the dish ids this user already voted for, so a
/// repeat vote is answered without a round-trip. The set is only a cache:
/// the store's unique constraint stays the source of truth, so a stale or
/// lost cache costs an extra request, never a double vote.
pub struct VotingSession {
    store: Arc<dyn VotingStore>,
    party: EventType,
    user: Option<AuthUser>,
    voted: HashSet<i64>,
}

impl VotingSession {
    pub fn new(store: Arc<dyn VotingStore>, party: EventType, user: Option<AuthUser>) -> Self {
        Self {
            store,
            party,
            user,
            voted: HashSet::new(),
        }
    }

    /// Seed the voted cache, e.g. from the cookie session.
    pub fn with_voted(mut self, voted: HashSet<i64>) -> Self {
        self.voted = voted;
        self
    }

    pub fn party(&self) -> EventType {
        self.party
    }

    pub fn voted_dish_ids(&self) -> &HashSet<i64> {
        &self.voted
    }

    fn user_id(&self) -> Result<i64, AppError> {
        self.user.map(|u| u.id).ok_or(AppError::Unauthenticated)
    }

    /// Suggest a new dish for this party. The name is trimmed before
    /// validation; duplicates (case-insensitive, per party) come back as
    /// [`AppError::DuplicateName`] regardless of which caller hit the
    /// constraint first.
    pub async fn suggest_dish(&self, name: &str) -> Result<Dish, AppError> {
        let user_id = self.user_id()?;
        let name = name.trim();
        if let Some(msg) = validate::validate_dish_name(name) {
            return Err(AppError::Validation(msg));
        }
        match self.store.insert_dish(name, self.party, user_id).await {
            Ok(dish) => Ok(dish),
            Err(StoreError::UniqueViolation) => Err(AppError::DuplicateName),
            Err(e) => Err(AppError::Persistence(e.to_string())),
        }
    }

    /// Cast this user's vote for a dish. At most one vote per user per
    /// dish: a repeat the session has already seen is rejected locally;
    /// one it has not (another device, a lost cookie) is rejected by the
    /// store's constraint and learned into the cache either way.
    pub async fn cast_vote(&mut self, dish_id: i64) -> Result<Vote, AppError> {
        let user_id = self.user_id()?;
        if self.voted.contains(&dish_id) {
            return Err(AppError::AlreadyVoted);
        }
        match self.store.insert_vote(dish_id, user_id).await {
            Ok(vote) => {
                self.voted.insert(dish_id);
                Ok(vote)
            }
            Err(StoreError::UniqueViolation) => {
                self.voted.insert(dish_id);
                Err(AppError::AlreadyVoted)
            }
            Err(StoreError::NotFound) => Err(AppError::NotFound),
            Err(e) => Err(AppError::Persistence(e.to_string())),
        }
    }

    /// Delete every dish of this party, and with them every vote. Who may
    /// do this is decided at the handler boundary; the session just clears
    /// its cache alongside. Returns the number of dishes removed.
    pub async fn reset_event(&mut self) -> Result<u64, AppError> {
        match self.store.delete_dishes_for_party(self.party).await {
            Ok(removed) => {
                self.voted.clear();
                Ok(removed)
            }
            Err(e) => Err(AppError::Persistence(e.to_string())),
        }
    }

    /// Authoritative re-read: dishes with tallies plus this user's votes.
    /// The local cache is replaced wholesale by what the store reports, so
    /// any optimistic state is overwritten.
    pub async fn refresh(&mut self) -> Result<EventView, AppError> {
        let dishes = self
            .store
            .dishes_with_votes(self.party)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        let voted = match self.user {
            Some(user) => self
                .store
                .voted_dish_ids(user.id, self.party)
                .await
                .map_err(|e| AppError::Persistence(e.to_string()))?,
            None => Vec::new(),
        };
        self.voted = voted.iter().copied().collect();

        let view = tally::tally(dishes);
        Ok(EventView {
            dishes: view.ordered,
            winner_ids: view.winner_ids,
            voted_dish_ids: voted,
        })
    }
}
