use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppResult,
    extract::ValidJson,
    meals::{
        dto::{MealListResponse, MealMetrics, MealRequest, MealResponse, MessageResponse},
        services,
    },
    session::CurrentUser,
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<MealRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<MessageResponse>)> {
    let fields = services::validate_meal(payload)?;
    let meal = services::create_meal(state.meals.as_ref(), user.id, fields).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&format!("/meals/{}", meal.id)).map_err(anyhow::Error::from)?,
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(MessageResponse {
            message: "Meal created",
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MealListResponse>> {
    let meals = services::list_meals(state.meals.as_ref(), user.id).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<MealResponse>> {
    let meal_id = services::parse_meal_id(&id)?;
    let meal = services::get_meal(state.meals.as_ref(), user.id, meal_id).await?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<MealRequest>,
) -> AppResult<StatusCode> {
    let meal_id = services::parse_meal_id(&id)?;
    let fields = services::validate_meal(payload)?;
    services::update_meal(state.meals.as_ref(), user.id, meal_id, fields).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let meal_id = services::parse_meal_id(&id)?;
    services::delete_meal(state.meals.as_ref(), user.id, meal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MealMetrics>> {
    let metrics = services::meal_metrics(state.meals.as_ref(), user.id).await?;
    Ok(Json(metrics))
}
