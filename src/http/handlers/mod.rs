pub mod admin;
pub mod auth;
pub mod professor;
pub mod public;
pub mod student;

use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::policy::Actor;

/// Every protected route resolves its actor from the presented token; the
/// client never gets to assert its own role.
pub(super) fn actor_from(state: &AppState, auth: &BearerAuth) -> Result<Actor, ApiError> {
    state
        .sessions
        .resolve(auth.token())
        .ok_or(ApiError::Unauthorized)
}
