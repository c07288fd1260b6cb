use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub user_id: Uuid,
}

/// The mutable part of a meal, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct MealFields {
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    pub date: OffsetDateTime,
}
