use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::models::event::EventType;
use crate::store::{StoreError, VotingStore};

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Ensure the admin account exists and carries the admin role. Idempotent:
/// an existing account keeps its password, only the role grant is
/// re-applied. Returns the admin's user id.
pub async fn seed_admin(
    store: &dyn VotingStore,
    email: &str,
    plain_password: &str,
) -> Result<i64, StoreError> {
    if let Some(existing) = store.find_user_by_email(email).await? {
        store.grant_admin(existing.id).await?;
        log::info!("Admin account {email} already present");
        return Ok(existing.id);
    }

    let hash = password::hash_password(plain_password)
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    let account = store.create_user(email, &hash).await?;
    store.grant_admin(account.id).await?;
    log::info!("Seeded admin account {email}");
    Ok(account.id)
}

/// Seed the launch menu for both parties, attributed to `suggested_by`.
/// Skipped per party once any dish exists; tallies always start at zero
/// because votes are never seeded.
pub async fn seed_demo(store: &dyn VotingStore, suggested_by: i64) -> Result<(), StoreError> {
    for party in EventType::ALL {
        if !store.dishes_with_votes(party).await?.is_empty() {
            log::info!("Dishes already present for {party}, skipping seed");
            continue;
        }

        let names: &[&str] = match party {
            EventType::Natal => &["Peru Assado", "Bacalhoada", "Farofa de Frutas"],
            EventType::Reveillon => &["Lentilha da Sorte", "Salpicão de Frango", "Pudim de Leite"],
        };
        for name in names {
            match store.insert_dish(name, party, suggested_by).await {
                Ok(_) => {}
                // Lost a race against another instance seeding the same menu
                Err(StoreError::UniqueViolation) => {}
                Err(e) => return Err(e),
            }
        }
        log::info!("Seeded {} dishes for {party}", names.len());
    }
    Ok(())
}
