use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::calc::AttendanceSeverity;
use crate::http::error::ApiError;
use crate::http::session::SessionStore;
use crate::policy::Role;
use crate::repo::{AttendanceRow, BareGrade, GradeRow, Profile, StudentListing};

/// Shared application state. The store handle is injected at construction and
/// serialized behind a lock; there is no process-global connection.
pub struct AppState {
    db: Mutex<Connection>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
            sessions: SessionStore::default(),
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db.lock().map_err(|_| ApiError::Internal)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct NewGradeBody {
    pub student_id: i64,
    pub subject_id: i64,
    pub section: i64,
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewClassBody {
    pub name: String,
    pub year: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewUserBody {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub class_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    #[serde(rename = "subjectId")]
    pub subject_id: Option<i64>,
}

/// Roster entry; grades and their average appear only when the roster was
/// filtered to one subject.
#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grades: Option<Vec<BareGrade>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubjectSummary {
    pub subject_id: i64,
    pub subject_name: String,
    pub sections: BTreeMap<i64, Vec<i64>>,
    pub average: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub subjects: Vec<SubjectSummary>,
    pub overall_average: Option<f64>,
    pub absence_count: usize,
    pub attendance_severity: AttendanceSeverity,
    pub elevated_absences: bool,
}

#[derive(Debug, Serialize)]
pub struct DetailedStudent {
    #[serde(flatten)]
    pub student: StudentListing,
    pub grades: Vec<GradeRow>,
    pub attendance: Vec<AttendanceRow>,
    pub overall_average: Option<f64>,
    pub absence_count: usize,
    pub attendance_severity: AttendanceSeverity,
    pub elevated_absences: bool,
}
