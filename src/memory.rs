//! In-process store used by the test suite in place of Postgres.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    meals::{
        repo::MealRepo,
        repo_types::{Meal, MealFields},
    },
    users::{repo::UserRepo, repo_types::User},
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    meals: RwLock<Vec<Meal>>,
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_session(&self, session_id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.session_id == session_id).cloned())
    }

    async fn create(&self, user: &User) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        users.push(user.clone());
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn insert(&self, meal: &Meal) -> anyhow::Result<()> {
        self.meals.write().await.push(meal.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.iter().filter(|m| m.user_id == user_id).cloned().collect())
    }

    async fn list_by_user_newest_first(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let mut rows = self.list_by_user(user_id).await?;
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals
            .iter()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        fields: &MealFields,
    ) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let Some(meal) = meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
        else {
            return Ok(false);
        };
        meal.name = fields.name.clone();
        meal.description = fields.description.clone();
        meal.is_on_diet = fields.is_on_diet;
        meal.date = fields.date;
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == meal_id && m.user_id == user_id));
        Ok(meals.len() < before)
    }
}
