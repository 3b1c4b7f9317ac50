use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account row as stored — includes the password hash. Anonymous accounts
/// have neither email nor hash; the hash never leaves this type.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Identity resolved from the cookie session. `is_admin` is a hint for
/// clients; privileged handlers re-check the role against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub is_anonymous: bool,
    pub is_admin: bool,
}

/// Role attached to an account; accounts without a role row are `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// Form input for login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

const AVATAR_KEYWORDS: [&str; 12] = [
    "star", "sun", "sea", "sky", "cloud", "moon", "mountain", "tree", "river", "flower", "comet",
    "galaxy",
];

/// Deterministic abstract-drawing avatar for an account id.
pub fn avatar_url(user_id: i64) -> String {
    let keyword = AVATAR_KEYWORDS[user_id.unsigned_abs() as usize % AVATAR_KEYWORDS.len()];
    format!("https://img.usecurling.com/p/128/128?q={keyword}%20abstract%20drawing")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_is_deterministic() {
        assert_eq!(avatar_url(7), avatar_url(7));
    }

    #[test]
    fn test_avatar_url_cycles_through_keywords() {
        assert_eq!(avatar_url(0), avatar_url(12));
        assert_ne!(avatar_url(0), avatar_url(1));
        assert!(avatar_url(3).contains("%20abstract%20drawing"));
    }
}
