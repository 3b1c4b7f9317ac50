use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::auth::session::{clear_voted_cache, ensure_user, store_voted_cache, voted_cache};
use crate::broadcast::{Change, ChangeHub};
use crate::errors::AppError;
use crate::models::dish::{DishForm, DishWithVotes};
use crate::models::event::EventType;
use crate::models::user::UserRole;
use crate::store::VotingStore;
use crate::voting::VotingSession;

/// Standings payload for one party.
#[derive(Debug, Serialize)]
struct EventDishesResponse {
    dishes: Vec<DishWithVotes>,
    winner_ids: Vec<i64>,
    voted_dish_ids: Vec<i64>,
}

fn parse_event(raw: &str) -> Result<EventType, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Evento desconhecido: {raw}")))
}

/// GET /api/v1/events/{event}/dishes - Standings for one party
pub async fn list(
    store: web::Data<dyn VotingStore>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let party = parse_event(&path)?;
    let user = ensure_user(&session, store.get_ref()).await?;

    let mut voting = VotingSession::new(store.into_inner(), party, Some(user));
    let view = voting.refresh().await?;
    store_voted_cache(&session, party, voting.voted_dish_ids());

    Ok(HttpResponse::Ok().json(EventDishesResponse {
        dishes: view.dishes,
        winner_ids: view.winner_ids,
        voted_dish_ids: view.voted_dish_ids,
    }))
}

/// POST /api/v1/events/{event}/dishes - Suggest a new dish
pub async fn suggest(
    store: web::Data<dyn VotingStore>,
    session: Session,
    hub: web::Data<ChangeHub>,
    path: web::Path<String>,
    form: web::Json<DishForm>,
) -> Result<HttpResponse, AppError> {
    let party = parse_event(&path)?;
    let user = ensure_user(&session, store.get_ref()).await?;

    let voting = VotingSession::new(store.into_inner(), party, Some(user));
    let dish = voting.suggest_dish(&form.name).await?;
    hub.publish(party, Change::DishAdded);
    log::info!("user {} suggested dish {} for {party}", user.id, dish.id);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Prato sugerido com sucesso!",
        "dish": dish,
    })))
}

/// POST /api/v1/events/{event}/dishes/{id}/vote - Cast the user's vote
pub async fn vote(
    store: web::Data<dyn VotingStore>,
    session: Session,
    hub: web::Data<ChangeHub>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (raw_event, dish_id) = path.into_inner();
    let party = parse_event(&raw_event)?;
    let user = ensure_user(&session, store.get_ref()).await?;

    let mut voting = VotingSession::new(store.into_inner(), party, Some(user))
        .with_voted(voted_cache(&session, party));
    let outcome = voting.cast_vote(dish_id).await;
    // Persist the cache even for a rejected repeat, so a vote learned from
    // the store's constraint is remembered by this session too.
    store_voted_cache(&session, party, voting.voted_dish_ids());
    outcome?;

    hub.publish(party, Change::VoteCast);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Voto computado!",
    })))
}

/// DELETE /api/v1/events/{event}/dishes - Admin-only voting reset
pub async fn reset(
    store: web::Data<dyn VotingStore>,
    session: Session,
    hub: web::Data<ChangeHub>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let party = parse_event(&path)?;
    let user = ensure_user(&session, store.get_ref()).await?;

    // The session flag is only a hint; the role is re-read from the store.
    let role = store
        .user_role(user.id)
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    if role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }

    let mut voting = VotingSession::new(store.into_inner(), party, Some(user));
    let removed = voting.reset_event().await?;
    clear_voted_cache(&session, party);
    hub.publish(party, Change::VotingReset);
    log::info!("admin {} reset {party}: {removed} dishes removed", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Votação reiniciada com sucesso!",
    })))
}
