use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use farofeiros::auth::rate_limit::RateLimiter;
use farofeiros::broadcast::ChangeHub;
use farofeiros::db;
use farofeiros::handlers;
use farofeiros::store::VotingStore;
use farofeiros::store::memory::MemStore;
use farofeiros::store::postgres::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // STORE=memory runs without PostgreSQL; data is lost on restart.
    let store: Arc<dyn VotingStore> = match std::env::var("STORE").as_deref() {
        Ok("memory") => {
            log::warn!("Using the in-memory store — data is lost on restart");
            Arc::new(MemStore::new())
        }
        _ => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
            let pool = db::init_pool(&database_url)
                .await
                .expect("Failed to connect to PostgreSQL");
            db::run_migrations(&pool).await;
            Arc::new(PgStore::new(pool))
        }
    };

    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@farofeiros.dev".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let admin_id = db::seed_admin(store.as_ref(), &admin_email, &admin_password)
        .await
        .expect("Failed to seed admin account");

    // SEED_DEMO=1 loads the launch menu so the standings aren't empty
    if std::env::var("SEED_DEMO").as_deref() == Ok("1") {
        db::seed_demo(store.as_ref(), admin_id)
            .await
            .expect("Failed to seed demo dishes");
    }

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    // Shared across workers: one store, one change hub, one limiter
    let store_data = web::Data::from(store);
    let hub = web::Data::new(ChangeHub::new());
    let limiter = web::Data::new(RateLimiter::new());

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(store_data.clone())
            .app_data(hub.clone())
            .app_data(limiter.clone())
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "message": "Rota não encontrada.",
                }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
