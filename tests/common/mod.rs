//! Shared test infrastructure for the integration suites.
//!
//! Everything runs against the in-memory store, so the suites need no
//! external services; the PostgreSQL suite has its own ignored setup.

#![allow(dead_code)] // not every suite uses every helper

use std::sync::Arc;

use farofeiros::models::event::EventType;
use farofeiros::models::user::AuthUser;
use farofeiros::store::VotingStore;
use farofeiros::store::memory::MemStore;
use farofeiros::voting::VotingSession;

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASS: &str = "admin123";

/// Fresh in-memory store, as the trait object the rest of the app sees.
pub fn mem_store() -> Arc<dyn VotingStore> {
    Arc::new(MemStore::new())
}

/// Create an anonymous account and wrap it as a session identity.
pub async fn anonymous_user(store: &dyn VotingStore) -> AuthUser {
    let account = store
        .create_anonymous_user()
        .await
        .expect("Failed to create anonymous user");
    AuthUser {
        id: account.id,
        is_anonymous: true,
        is_admin: false,
    }
}

/// Voting session for a fresh anonymous user on `party`.
pub async fn session_for(store: &Arc<dyn VotingStore>, party: EventType) -> VotingSession {
    let user = anonymous_user(store.as_ref()).await;
    VotingSession::new(Arc::clone(store), party, Some(user))
}
