use actix_web::{delete, get, post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde_json::json;

use crate::calc;
use crate::http::error::ApiError;
use crate::http::types::{AppState, DetailedStudent, NewClassBody, NewUserBody};
use crate::policy::{self, Role};
use crate::repo::{self, NewUser};

#[get("/admin/users")]
pub async fn users(
    auth: BearerAuth,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }
    let conn = state.db()?;
    let users = repo::users_with_class(&conn)?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/admin/classes")]
pub async fn classes(
    auth: BearerAuth,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }
    let conn = state.db()?;
    let classes = repo::classes_with_student_count(&conn)?;
    Ok(HttpResponse::Ok().json(classes))
}

/// Every student with their full grade and attendance history plus the
/// derived absence picture and overall average.
#[get("/admin/students-detailed")]
pub async fn students_detailed(
    auth: BearerAuth,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }

    let conn = state.db()?;
    let students = repo::students_with_class(&conn)?;
    let detailed: Vec<DetailedStudent> = students
        .into_iter()
        .map(|s| {
            let grades = repo::grades_for_student(&conn, s.id)?;
            let attendance = repo::attendance_for_student(&conn, s.id)?;
            let absences = calc::absence_count(attendance.iter().map(|a| a.status));
            Ok(DetailedStudent {
                overall_average: calc::overall_average(grades.iter().map(|g| g.value)),
                absence_count: absences,
                attendance_severity: calc::attendance_severity(absences),
                elevated_absences: calc::elevated_absences(absences),
                student: s,
                grades,
                attendance,
            })
        })
        .collect::<rusqlite::Result<_>>()?;

    Ok(HttpResponse::Ok().json(detailed))
}

#[post("/admin/classes")]
pub async fn create_class(
    auth: BearerAuth,
    state: web::Data<AppState>,
    body: web::Json<NewClassBody>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("class name must not be empty".to_string()));
    }
    if !(1..=4).contains(&body.year) {
        return Err(ApiError::Validation("year must be between 1 and 4".to_string()));
    }

    let conn = state.db()?;
    repo::create_class(&conn, name, body.year)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[post("/admin/users")]
pub async fn create_user(
    auth: BearerAuth,
    state: web::Data<AppState>,
    body: web::Json<NewUserBody>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }

    let body = body.into_inner();
    for (field, value) in [
        ("email", &body.email),
        ("password", &body.password),
        ("name", &body.name),
        ("surname", &body.surname),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("{field} must not be empty")));
        }
    }
    if let Some(year) = body.year {
        if !(1..=4).contains(&year) {
            return Err(ApiError::Validation("year must be between 1 and 4".to_string()));
        }
    }
    // Only students belong to a class.
    if body.class_id.is_some() && body.role != Role::Student {
        return Err(ApiError::Validation(
            "only students can be assigned to a class".to_string(),
        ));
    }

    let conn = state.db()?;
    repo::create_user(
        &conn,
        &NewUser {
            email: body.email,
            password: body.password,
            role: body.role,
            name: body.name,
            surname: body.surname,
            dob: body.dob,
            year: body.year,
            class_id: body.class_id,
        },
    )?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[delete("/admin/users/{id}")]
pub async fn delete_user(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !policy::is_admin(&actor) {
        return Err(ApiError::Forbidden);
    }
    let user_id = path.into_inner();

    {
        let conn = state.db()?;
        repo::delete_user(&conn, user_id)?;
    }
    // The deleted account must not keep a usable session.
    state.sessions.revoke_user(user_id);

    log::info!("admin {} deleted user {}", actor.id, user_id);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
