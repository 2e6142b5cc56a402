use actix_web::{post, web, HttpResponse};

use crate::http::error::ApiError;
use crate::http::types::{AppState, LoginBody, LoginResponse};
use crate::repo;

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginBody>,
) -> Result<HttpResponse, ApiError> {
    let profile = {
        let conn = state.db()?;
        repo::authenticate(&conn, &body.email, &body.password)?
    }
    .ok_or(ApiError::BadCredentials)?;

    let token = state.sessions.issue(profile.id, profile.role);
    log::info!("login: user {} ({})", profile.id, profile.role.as_str());
    Ok(HttpResponse::Ok().json(LoginResponse { profile, token }))
}
