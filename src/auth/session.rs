use std::collections::HashSet;

use actix_session::Session;

use crate::errors::AppError;
use crate::models::event::EventType;
use crate::models::user::AuthUser;
use crate::store::VotingStore;

const USER_ID_KEY: &str = "user_id";
const ANONYMOUS_KEY: &str = "is_anonymous";
const ADMIN_KEY: &str = "is_admin";

/// Identity already present in the cookie session, if any.
pub fn session_user(session: &Session) -> Option<AuthUser> {
    let id = session.get::<i64>(USER_ID_KEY).unwrap_or(None)?;
    let is_anonymous = session
        .get::<bool>(ANONYMOUS_KEY)
        .unwrap_or(None)
        .unwrap_or(true);
    let is_admin = session
        .get::<bool>(ADMIN_KEY)
        .unwrap_or(None)
        .unwrap_or(false);
    Some(AuthUser {
        id,
        is_anonymous,
        is_admin,
    })
}

/// Resolve the current user, creating an anonymous account on first
/// contact so visitors can suggest and vote before ever registering.
pub async fn ensure_user(
    session: &Session,
    store: &dyn VotingStore,
) -> Result<AuthUser, AppError> {
    if let Some(user) = session_user(session) {
        return Ok(user);
    }
    let account = store
        .create_anonymous_user()
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    let user = AuthUser {
        id: account.id,
        is_anonymous: true,
        is_admin: false,
    };
    remember_user(session, user);
    log::debug!("created anonymous user {}", user.id);
    Ok(user)
}

/// Write the identity keys; used after anonymous bootstrap, login and
/// registration.
pub fn remember_user(session: &Session, user: AuthUser) {
    let _ = session.insert(USER_ID_KEY, user.id);
    let _ = session.insert(ANONYMOUS_KEY, user.is_anonymous);
    let _ = session.insert(ADMIN_KEY, user.is_admin);
}

/// Dish ids this session already voted for in `party`. A cache only: the
/// store's vote constraint stays authoritative, this just skips known-bad
/// round-trips.
pub fn voted_cache(session: &Session, party: EventType) -> HashSet<i64> {
    session
        .get::<Vec<i64>>(&voted_key(party))
        .unwrap_or(None)
        .unwrap_or_default()
        .into_iter()
        .collect()
}

pub fn store_voted_cache(session: &Session, party: EventType, voted: &HashSet<i64>) {
    let mut ids: Vec<i64> = voted.iter().copied().collect();
    ids.sort_unstable();
    let _ = session.insert(voted_key(party), ids);
}

pub fn clear_voted_cache(session: &Session, party: EventType) {
    session.remove(&voted_key(party));
}

fn voted_key(party: EventType) -> String {
    format!("voted_dishes_{party}")
}
