use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppResult,
    extract::ValidJson,
    session::{cookies::session_cookie, CurrentUser},
    state::AppState,
    users::{
        dto::{MeResponse, PublicUser, RegisterRequest},
        services::{register, validate_registration},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, HeaderMap)> {
    let input = validate_registration(&payload.name, &payload.email)?;
    let user = register(state.users.as_ref(), input).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&state.config.session, user.session_id)?,
    );
    Ok((StatusCode::CREATED, headers))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_response_hides_session_token() {
        let response = MeResponse {
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["email"], "ana@example.com");
        assert!(json["user"].get("session_id").is_none());
    }
}
