//! Authentication tests — covers password hashing, verification, input
//! validation, login rate limiting and account management.

mod common;

use std::net::{IpAddr, Ipv4Addr};

use common::*;
use farofeiros::auth::rate_limit::RateLimiter;
use farofeiros::auth::{password, validate};
use farofeiros::db;
use farofeiros::models::user::UserRole;
use farofeiros::store::{StoreError, VotingStore};

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_hash_password_success() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert!(!hash.is_empty());
    assert!(hash.len() > 20); // Argon2 hashes are long
}

#[test]
fn test_verify_password_correct() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let verified = password::verify_password(TEST_PASSWORD, &hash).expect("Verification failed");

    assert!(verified);
}

#[test]
fn test_verify_password_incorrect() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    let verified = password::verify_password("wrongpassword", &hash).expect("Verification failed");

    assert!(!verified);
}

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD).expect("Failed to hash first password");
    let hash2 = password::hash_password(TEST_PASSWORD).expect("Failed to hash second password");

    // Same password should produce different hashes (different salts)
    assert_ne!(hash1, hash2);

    // But both hashes should verify with the same password
    assert!(password::verify_password(TEST_PASSWORD, &hash1).expect("Verification 1 failed"));
    assert!(password::verify_password(TEST_PASSWORD, &hash2).expect("Verification 2 failed"));
}

#[test]
fn test_validate_dish_name() {
    assert!(validate::validate_dish_name("Peru Assado").is_none());
    assert!(validate::validate_dish_name("  Farofa  ").is_none());
    assert!(validate::validate_dish_name("").is_some());
    assert!(validate::validate_dish_name("   ").is_some());
    assert!(validate::validate_dish_name(&"x".repeat(81)).is_some());
    assert!(validate::validate_dish_name(&"x".repeat(80)).is_none());
}

#[test]
fn test_validate_email() {
    assert!(validate::validate_email("ana@example.com").is_none());
    assert!(validate::validate_email("").is_some());
    assert!(validate::validate_email("not-an-email").is_some());
    assert!(validate::validate_email("missing-dot@com").is_some());
}

#[test]
fn test_validate_password() {
    assert!(validate::validate_password("longenough").is_none());
    assert!(validate::validate_password("").is_some());
    assert!(validate::validate_password("short").is_some());
}

#[test]
fn test_rate_limiter_blocks_after_failures() {
    let limiter = RateLimiter::new();
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

    for _ in 0..4 {
        limiter.record_failure(ip);
    }
    assert!(!limiter.is_blocked(ip));

    limiter.record_failure(ip);
    assert!(limiter.is_blocked(ip));

    // Another IP is unaffected.
    assert!(!limiter.is_blocked(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
}

#[test]
fn test_rate_limiter_clear_unblocks() {
    let limiter = RateLimiter::new();
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3));

    for _ in 0..5 {
        limiter.record_failure(ip);
    }
    assert!(limiter.is_blocked(ip));

    limiter.clear(ip);
    assert!(!limiter.is_blocked(ip));
}

#[tokio::test]
async fn test_create_and_find_account() {
    let store = mem_store();
    let hash = password::hash_password(TEST_PASSWORD).unwrap();

    let account = store.create_user("ana@test.com", &hash).await.unwrap();
    assert!(!account.is_anonymous);

    let found = store
        .find_user_by_email("ana@test.com")
        .await
        .unwrap()
        .expect("account should be found");
    assert_eq!(found.id, account.id);
    assert!(password::verify_password(TEST_PASSWORD, found.password_hash.as_deref().unwrap())
        .unwrap());

    assert!(store.find_user_by_email("nobody@test.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let store = mem_store();
    store.create_user("dup@test.com", "hash").await.unwrap();

    let result = store.create_user("dup@test.com", "other").await;
    assert!(matches!(result, Err(StoreError::UniqueViolation)));
}

#[tokio::test]
async fn test_anonymous_accounts_have_no_credentials() {
    let store = mem_store();
    let account = store.create_anonymous_user().await.unwrap();

    assert!(account.is_anonymous);
    assert!(account.email.is_none());
    assert!(account.password_hash.is_none());
}

#[tokio::test]
async fn test_seed_admin_is_idempotent() {
    let store = mem_store();

    let first = db::seed_admin(store.as_ref(), ADMIN_EMAIL, ADMIN_PASS)
        .await
        .unwrap();
    let second = db::seed_admin(store.as_ref(), ADMIN_EMAIL, ADMIN_PASS)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.user_role(first).await.unwrap(), UserRole::Admin);

    let account = store
        .find_user_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("admin account exists");
    assert!(password::verify_password(ADMIN_PASS, account.password_hash.as_deref().unwrap())
        .unwrap());
}

#[tokio::test]
async fn test_seed_demo_fills_both_parties_once() {
    let store = mem_store();
    let admin_id = db::seed_admin(store.as_ref(), ADMIN_EMAIL, ADMIN_PASS)
        .await
        .unwrap();

    db::seed_demo(store.as_ref(), admin_id).await.unwrap();
    // Re-running changes nothing.
    db::seed_demo(store.as_ref(), admin_id).await.unwrap();

    for party in farofeiros::models::event::EventType::ALL {
        let dishes = store.dishes_with_votes(party).await.unwrap();
        assert_eq!(dishes.len(), 3);
        assert!(dishes.iter().all(|d| d.votes == 0));
    }
}
