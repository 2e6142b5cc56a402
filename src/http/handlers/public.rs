use actix_web::{get, web, HttpResponse};

use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::repo;

#[get("/news")]
pub async fn news(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let conn = state.db()?;
    let items = repo::news(&conn)?;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/staff")]
pub async fn staff(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let conn = state.db()?;
    let staff = repo::staff_directory(&conn)?;
    Ok(HttpResponse::Ok().json(staff))
}
