use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use super::cookies::session_token;
use crate::{error::AppError, state::AppState, users::repo_types::User};

/// Resolves the session cookie to the calling user.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.config.session.cookie_name) else {
            debug!("missing or malformed session cookie");
            return Err(AppError::Unauthenticated);
        };

        match state.users.find_by_session(token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!("unknown session token");
                Err(AppError::Unauthenticated)
            }
        }
    }
}
