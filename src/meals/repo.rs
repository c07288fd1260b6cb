use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealFields};

/// Owner-scoped access to the meals table. Every method filters by `user_id`.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()>;

    /// All of the user's meals in storage order.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;

    /// All of the user's meals, newest `date` first. Ties keep the store's order.
    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;

    /// Returns whether a row was updated.
    async fn update(&self, user_id: Uuid, meal_id: Uuid, fields: &MealFields)
        -> anyhow::Result<bool>;

    /// Returns whether a row was deleted.
    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO meals (id, name, description, is_on_diet, date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(meal.id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.is_on_diet)
        .bind(meal.date)
        .bind(meal.user_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, is_on_diet, date, user_id
            FROM meals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, is_on_diet, date, user_id
            FROM meals
            WHERE user_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, is_on_diet, date, user_id
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(meal)
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        fields: &MealFields,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE meals
               SET name = $3, description = $4, is_on_diet = $5, date = $6
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.is_on_diet)
        .bind(fields.date)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND user_id = $2"#)
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
