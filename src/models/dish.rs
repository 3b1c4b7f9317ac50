use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventType;

/// A suggested dish. Immutable once created; votes reference it by id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub party_type: EventType,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Dish annotated with its derived vote count, as read from the
/// `dishes_with_votes` view.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DishWithVotes {
    pub id: i64,
    pub name: String,
    pub party_type: EventType,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
}

impl DishWithVotes {
    pub fn from_dish(dish: &Dish, votes: i64) -> Self {
        DishWithVotes {
            id: dish.id,
            name: dish.name.clone(),
            party_type: dish.party_type,
            user_id: dish.user_id,
            created_at: dish.created_at,
            votes,
        }
    }
}

/// Form input for suggesting a dish.
#[derive(Debug, Clone, Deserialize)]
pub struct DishForm {
    pub name: String,
}
