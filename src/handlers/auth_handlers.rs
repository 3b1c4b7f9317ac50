use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::auth::session::{clear_voted_cache, ensure_user, remember_user};
use crate::auth::{password, rate_limit::RateLimiter, validate};
use crate::errors::AppError;
use crate::models::event::EventType;
use crate::models::user::{AuthUser, CredentialsForm, UserRole, avatar_url};
use crate::store::{StoreError, VotingStore};

fn user_payload(user: AuthUser) -> serde_json::Value {
    json!({
        "id": user.id,
        "is_anonymous": user.is_anonymous,
        "is_admin": user.is_admin,
        "avatar_url": avatar_url(user.id),
    })
}

/// A new identity invalidates whatever the previous one had voted for.
fn forget_votes(session: &Session) {
    for party in EventType::ALL {
        clear_voted_cache(session, party);
    }
}

/// POST /api/v1/auth/register - Create a credentialed account and sign it in
pub async fn register(
    store: web::Data<dyn VotingStore>,
    session: Session,
    form: web::Json<CredentialsForm>,
) -> Result<HttpResponse, AppError> {
    let email = form.email.trim().to_lowercase();
    if let Some(msg) = validate::validate_email(&email) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_password(&form.password) {
        return Err(AppError::Validation(msg));
    }

    let hash =
        password::hash_password(&form.password).map_err(|e| AppError::Hash(e.to_string()))?;
    let account = match store.create_user(&email, &hash).await {
        Ok(account) => account,
        Err(StoreError::UniqueViolation) => return Err(AppError::DuplicateEmail),
        Err(e) => return Err(AppError::Persistence(e.to_string())),
    };

    let user = AuthUser {
        id: account.id,
        is_anonymous: false,
        is_admin: false,
    };
    forget_votes(&session);
    remember_user(&session, user);
    log::info!("registered user {}", user.id);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Cadastro realizado!",
        "user": user_payload(user),
    })))
}

/// POST /api/v1/auth/login - Credentialed sign-in
pub async fn login(
    req: HttpRequest,
    store: web::Data<dyn VotingStore>,
    session: Session,
    form: web::Json<CredentialsForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("rate-limited login attempt from {ip}");
        return Err(AppError::RateLimited);
    }

    let email = form.email.trim().to_lowercase();
    let found = store
        .find_user_by_email(&email)
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;

    // Anonymous accounts carry no hash and can never match.
    let verified = match &found {
        Some(account) => match account.password_hash.as_deref() {
            Some(hash) => password::verify_password(&form.password, hash)
                .map_err(|e| AppError::Hash(e.to_string()))?,
            None => false,
        },
        None => false,
    };

    match found {
        Some(account) if verified => {
            limiter.clear(ip);

            let role = store
                .user_role(account.id)
                .await
                .map_err(|e| AppError::Persistence(e.to_string()))?;
            let user = AuthUser {
                id: account.id,
                is_anonymous: false,
                is_admin: role == UserRole::Admin,
            };
            forget_votes(&session);
            remember_user(&session, user);
            log::info!("user {} logged in", user.id);

            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Login bem-sucedido!",
                "user": user_payload(user),
            })))
        }
        _ => {
            limiter.record_failure(ip);
            Err(AppError::InvalidCredentials)
        }
    }
}

/// POST /api/v1/auth/logout - Drop the session entirely
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Sessão encerrada.",
    })))
}

/// GET /api/v1/auth/me - Identity for the current session
pub async fn me(
    store: web::Data<dyn VotingStore>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user = ensure_user(&session, store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(user_payload(user)))
}
