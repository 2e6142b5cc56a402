use actix_web::{get, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use std::collections::HashMap;

use crate::calc;
use crate::http::error::ApiError;
use crate::http::types::{AppState, StudentSummary, SubjectSummary};
use crate::policy;
use crate::repo;

#[get("/student/{id}/grades")]
pub async fn grades(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let student_id = path.into_inner();
    if !policy::can_view_student(&actor, student_id) {
        return Err(ApiError::Forbidden);
    }
    let conn = state.db()?;
    // An unknown student has no grades; an empty list, not an error.
    let grades = repo::grades_for_student(&conn, student_id)?;
    Ok(HttpResponse::Ok().json(grades))
}

#[get("/student/{id}/profile")]
pub async fn profile(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let user_id = path.into_inner();
    if !policy::can_view_student(&actor, user_id) {
        return Err(ApiError::Forbidden);
    }
    let conn = state.db()?;
    let profile = repo::profile(&conn, user_id)?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Derived view over the student's raw rows: per-subject section grouping and
/// averages, the overall average, and the absence picture.
#[get("/student/{id}/summary")]
pub async fn summary(
    auth: BearerAuth,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let actor = super::actor_from(&state, &auth)?;
    let student_id = path.into_inner();
    if !policy::can_view_student(&actor, student_id) {
        return Err(ApiError::Forbidden);
    }

    let (grade_rows, attendance) = {
        let conn = state.db()?;
        if repo::profile(&conn, student_id)?.is_none() {
            return Err(ApiError::NotFound);
        }
        (
            repo::grades_for_student(&conn, student_id)?,
            repo::attendance_for_student(&conn, student_id)?,
        )
    };

    // Group by subject in first-seen order.
    let mut order: Vec<i64> = Vec::new();
    let mut by_subject: HashMap<i64, (String, Vec<(i64, i64)>)> = HashMap::new();
    for g in &grade_rows {
        let entry = by_subject.entry(g.subject_id).or_insert_with(|| {
            order.push(g.subject_id);
            (g.subject_name.clone(), Vec::new())
        });
        entry.1.push((g.section, g.value));
    }

    let subjects = order
        .iter()
        .map(|sid| {
            let (name, pairs) = &by_subject[sid];
            SubjectSummary {
                subject_id: *sid,
                subject_name: name.clone(),
                average: calc::subject_average(pairs.iter().map(|(_, v)| *v)),
                sections: calc::group_by_section(pairs.iter().copied()),
            }
        })
        .collect();

    let absences = calc::absence_count(attendance.iter().map(|a| a.status));
    Ok(HttpResponse::Ok().json(StudentSummary {
        subjects,
        overall_average: calc::overall_average(grade_rows.iter().map(|g| g.value)),
        absence_count: absences,
        attendance_severity: calc::attendance_severity(absences),
        elevated_absences: calc::elevated_absences(absences),
    }))
}
