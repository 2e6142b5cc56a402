use actix_web::{delete, get, post, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde_json::json;

use crate::calc;
use crate::http::error::ApiError;
use crate::http::types::{AppState, NewGradeBody, RosterEntry, RosterQuery};
use crate::policy::{self, Role};
use crate::repo;

#[get("/professor/{id}/assignments")]
pub async fn assignments(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let professor_id = path.into_inner();
    if !policy::can_view_assignments(&actor, professor_id) {
        return Err(ApiError::Forbidden);
    }
    let conn = state.db()?;
    let assignments = repo::assignments_for_professor(&conn, professor_id)?;
    Ok(HttpResponse::Ok().json(assignments))
}

/// Class roster; with `subjectId` each student carries that subject's grades
/// and their average.
#[get("/class/{class_id}/students")]
pub async fn roster(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let class_id = path.into_inner();

    let conn = state.db()?;
    let taught = if actor.role == Role::Professor {
        repo::teaching_pairs(&conn, actor.id)?
    } else {
        Vec::new()
    };
    if !policy::can_view_roster(&actor, &taught, class_id) {
        return Err(ApiError::Forbidden);
    }

    let students = repo::students_in_class(&conn, class_id)?;
    let entries: Vec<RosterEntry> = match query.subject_id {
        Some(subject_id) => students
            .into_iter()
            .map(|s| {
                let grades = repo::grades_for_student_in_subject(&conn, s.id, subject_id)?;
                let average = calc::subject_average(grades.iter().map(|g| g.value));
                Ok(RosterEntry {
                    id: s.id,
                    name: s.name,
                    surname: s.surname,
                    grades: Some(grades),
                    average,
                })
            })
            .collect::<rusqlite::Result<_>>()?,
        None => students
            .into_iter()
            .map(|s| RosterEntry {
                id: s.id,
                name: s.name,
                surname: s.surname,
                grades: None,
                average: None,
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(entries))
}

#[post("/grades")]
pub async fn create_grade(
    auth: BearerAuth,
    state: web::Data<AppState>,
    body: web::Json<NewGradeBody>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    if !(calc::SECTION_MIN..=calc::SECTION_MAX).contains(&body.section) {
        return Err(ApiError::Validation(
            "section must be between 1 and 4".to_string(),
        ));
    }

    let conn = state.db()?;
    let class_id = match repo::student_class(&conn, body.student_id)? {
        None => return Err(ApiError::NotFound),
        // No class means no assignment can cover the write.
        Some(None) => return Err(ApiError::Forbidden),
        Some(Some(class_id)) => class_id,
    };

    let taught = repo::teaching_pairs(&conn, actor.id)?;
    if !policy::can_manage_grade(&actor, &taught, body.subject_id, class_id) {
        return Err(ApiError::Forbidden);
    }

    repo::create_grade(&conn, body.student_id, body.subject_id, body.section, body.value)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Authorization is resolved from the stored grade. An id that is already gone
/// deletes nothing and still reports success.
#[delete("/grades/{id}")]
pub async fn delete_grade(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let grade_id = path.into_inner();

    let conn = state.db()?;
    match repo::grade_target(&conn, grade_id)? {
        Some(target) => {
            let taught = repo::teaching_pairs(&conn, actor.id)?;
            let allowed = target.class_id.map_or(false, |class_id| {
                policy::can_manage_grade(&actor, &taught, target.subject_id, class_id)
            });
            if !allowed {
                return Err(ApiError::Forbidden);
            }
            repo::delete_grade(&conn, grade_id)?;
        }
        None => {
            if actor.role == Role::Student {
                return Err(ApiError::Forbidden);
            }
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
