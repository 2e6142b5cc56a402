use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::auth;
use crate::calc::AttendanceStatus;
use crate::policy::{Role, TeachingPair};

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Role::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown role: {s}").into()))
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AttendanceStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        AttendanceStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown attendance status: {s}").into()))
    }
}

impl ToSql for AttendanceStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

/// A user row as handed to callers: never carries the stored credential.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    pub dob: Option<String>,
    pub year: Option<i64>,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeRow {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub section: i64,
    pub value: i64,
    pub created_at: Option<String>,
    pub subject_name: String,
}

/// Grade row without the subject join, as attached to roster entries.
#[derive(Debug, Clone, Serialize)]
pub struct BareGrade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub section: i64,
    pub value: i64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRow {
    pub id: i64,
    pub professor_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub class_year: i64,
    pub subject_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentRow {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRow {
    pub id: i64,
    pub student_id: i64,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffRow {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub role: Role,
    pub email: String,
    pub subjects: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithClass {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassWithCount {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentListing {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub surname: String,
    pub dob: Option<String>,
    pub year: Option<i64>,
    pub class_id: Option<i64>,
}

/// Where an existing grade points: used to authorize its deletion.
#[derive(Debug, Clone, Copy)]
pub struct GradeTarget {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_id: Option<i64>,
}

pub fn user_count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
}

/// Exact, case-sensitive email lookup; the salted digest comparison happens in
/// constant time. A bad email and a bad password are indistinguishable to the
/// caller.
pub fn authenticate(
    conn: &Connection,
    email: &str,
    password: &str,
) -> rusqlite::Result<Option<Profile>> {
    let row = conn
        .query_row(
            "SELECT u.id, u.email, u.password, u.role, u.name, u.surname,
                    u.dob, u.year, u.class_id, c.name
             FROM users u
             LEFT JOIN classes c ON u.class_id = c.id
             WHERE u.email = ?",
            [email],
            |r| {
                let stored: String = r.get(2)?;
                Ok((
                    stored,
                    Profile {
                        id: r.get(0)?,
                        email: r.get(1)?,
                        role: r.get(3)?,
                        name: r.get(4)?,
                        surname: r.get(5)?,
                        dob: r.get(6)?,
                        year: r.get(7)?,
                        class_id: r.get(8)?,
                        class_name: r.get(9)?,
                    },
                ))
            },
        )
        .optional()?;

    Ok(match row {
        Some((stored, profile)) if auth::verify_password(password, &stored) => Some(profile),
        _ => None,
    })
}

pub fn profile(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<Profile>> {
    conn.query_row(
        "SELECT u.id, u.email, u.role, u.name, u.surname, u.dob, u.year,
                u.class_id, c.name
         FROM users u
         LEFT JOIN classes c ON u.class_id = c.id
         WHERE u.id = ?",
        [user_id],
        |r| {
            Ok(Profile {
                id: r.get(0)?,
                email: r.get(1)?,
                role: r.get(2)?,
                name: r.get(3)?,
                surname: r.get(4)?,
                dob: r.get(5)?,
                year: r.get(6)?,
                class_id: r.get(7)?,
                class_name: r.get(8)?,
            })
        },
    )
    .optional()
}

pub fn grades_for_student(conn: &Connection, student_id: i64) -> rusqlite::Result<Vec<GradeRow>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.student_id, g.subject_id, g.section, g.value, g.created_at, s.name
         FROM grades g
         JOIN subjects s ON g.subject_id = s.id
         WHERE g.student_id = ?",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        Ok(GradeRow {
            id: r.get(0)?,
            student_id: r.get(1)?,
            subject_id: r.get(2)?,
            section: r.get(3)?,
            value: r.get(4)?,
            created_at: r.get(5)?,
            subject_name: r.get(6)?,
        })
    })?;
    rows.collect()
}

pub fn grades_for_student_in_subject(
    conn: &Connection,
    student_id: i64,
    subject_id: i64,
) -> rusqlite::Result<Vec<BareGrade>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, subject_id, section, value, created_at
         FROM grades
         WHERE student_id = ? AND subject_id = ?",
    )?;
    let rows = stmt.query_map([student_id, subject_id], |r| {
        Ok(BareGrade {
            id: r.get(0)?,
            student_id: r.get(1)?,
            subject_id: r.get(2)?,
            section: r.get(3)?,
            value: r.get(4)?,
            created_at: r.get(5)?,
        })
    })?;
    rows.collect()
}

pub fn attendance_for_student(
    conn: &Connection,
    student_id: i64,
) -> rusqlite::Result<Vec<AttendanceRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, student_id, date, status FROM attendance WHERE student_id = ?",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        Ok(AttendanceRow {
            id: r.get(0)?,
            student_id: r.get(1)?,
            date: r.get(2)?,
            status: r.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn assignments_for_professor(
    conn: &Connection,
    professor_id: i64,
) -> rusqlite::Result<Vec<AssignmentRow>> {
    let mut stmt = conn.prepare(
        "SELECT pa.id, pa.professor_id, pa.subject_id, pa.class_id,
                c.name, c.year, s.name
         FROM professor_assignments pa
         JOIN classes c ON pa.class_id = c.id
         JOIN subjects s ON pa.subject_id = s.id
         WHERE pa.professor_id = ?",
    )?;
    let rows = stmt.query_map([professor_id], |r| {
        Ok(AssignmentRow {
            id: r.get(0)?,
            professor_id: r.get(1)?,
            subject_id: r.get(2)?,
            class_id: r.get(3)?,
            class_name: r.get(4)?,
            class_year: r.get(5)?,
            subject_name: r.get(6)?,
        })
    })?;
    rows.collect()
}

/// The (subject, class) pairs a professor may grade, as consumed by the
/// access policy.
pub fn teaching_pairs(
    conn: &Connection,
    professor_id: i64,
) -> rusqlite::Result<Vec<TeachingPair>> {
    let mut stmt = conn.prepare(
        "SELECT subject_id, class_id FROM professor_assignments WHERE professor_id = ?",
    )?;
    let rows = stmt.query_map([professor_id], |r| {
        Ok(TeachingPair {
            subject_id: r.get(0)?,
            class_id: r.get(1)?,
        })
    })?;
    rows.collect()
}

pub fn students_in_class(conn: &Connection, class_id: i64) -> rusqlite::Result<Vec<StudentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, surname FROM users WHERE class_id = ? AND role = 'student'",
    )?;
    let rows = stmt.query_map([class_id], |r| {
        Ok(StudentRow {
            id: r.get(0)?,
            name: r.get(1)?,
            surname: r.get(2)?,
        })
    })?;
    rows.collect()
}

/// Class of a student row, if the student exists. Inner `None`: the student is
/// not assigned to any class.
pub fn student_class(
    conn: &Connection,
    student_id: i64,
) -> rusqlite::Result<Option<Option<i64>>> {
    conn.query_row(
        "SELECT class_id FROM users WHERE id = ? AND role = 'student'",
        [student_id],
        |r| r.get(0),
    )
    .optional()
}

pub fn grade_target(conn: &Connection, grade_id: i64) -> rusqlite::Result<Option<GradeTarget>> {
    conn.query_row(
        "SELECT g.student_id, g.subject_id, u.class_id
         FROM grades g
         JOIN users u ON g.student_id = u.id
         WHERE g.id = ?",
        [grade_id],
        |r| {
            Ok(GradeTarget {
                student_id: r.get(0)?,
                subject_id: r.get(1)?,
                class_id: r.get(2)?,
            })
        },
    )
    .optional()
}

pub fn create_grade(
    conn: &Connection,
    student_id: i64,
    subject_id: i64,
    section: i64,
    value: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO grades (student_id, subject_id, section, value) VALUES (?, ?, ?, ?)",
        params![student_id, subject_id, section, value],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Deleting an id that is already gone is a successful no-op. Returns the
/// number of rows removed (0 or 1).
pub fn delete_grade(conn: &Connection, grade_id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM grades WHERE id = ?", [grade_id])
}

pub fn grade_count(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM grades", [], |r| r.get(0))
}

/// Descending by the date string; ISO dates make that calendar order.
pub fn news(conn: &Connection) -> rusqlite::Result<Vec<NewsRow>> {
    let mut stmt =
        conn.prepare("SELECT id, title, content, date, category FROM news ORDER BY date DESC")?;
    let rows = stmt.query_map([], |r| {
        Ok(NewsRow {
            id: r.get(0)?,
            title: r.get(1)?,
            content: r.get(2)?,
            date: r.get(3)?,
            category: r.get(4)?,
        })
    })?;
    rows.collect()
}

/// Admins and professors with every taught subject folded into one field;
/// staff with no assignments get an empty string.
pub fn staff_directory(conn: &Connection) -> rusqlite::Result<Vec<StaffRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.surname, u.role, u.email,
                GROUP_CONCAT(DISTINCT s.name)
         FROM users u
         LEFT JOIN professor_assignments pa ON u.id = pa.professor_id
         LEFT JOIN subjects s ON pa.subject_id = s.id
         WHERE u.role IN ('professor', 'admin')
         GROUP BY u.id",
    )?;
    let rows = stmt.query_map([], |r| {
        let subjects: Option<String> = r.get(5)?;
        Ok(StaffRow {
            id: r.get(0)?,
            name: r.get(1)?,
            surname: r.get(2)?,
            role: r.get(3)?,
            email: r.get(4)?,
            subjects: subjects.unwrap_or_default(),
        })
    })?;
    rows.collect()
}

pub fn users_with_class(conn: &Connection) -> rusqlite::Result<Vec<UserWithClass>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email, u.role, u.name, u.surname, c.name
         FROM users u
         LEFT JOIN classes c ON u.class_id = c.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(UserWithClass {
            id: r.get(0)?,
            email: r.get(1)?,
            role: r.get(2)?,
            name: r.get(3)?,
            surname: r.get(4)?,
            class_name: r.get(5)?,
        })
    })?;
    rows.collect()
}

pub fn classes_with_student_count(conn: &Connection) -> rusqlite::Result<Vec<ClassWithCount>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.year,
                (SELECT COUNT(*) FROM users WHERE class_id = c.id AND role = 'student')
         FROM classes c",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ClassWithCount {
            id: r.get(0)?,
            name: r.get(1)?,
            year: r.get(2)?,
            student_count: r.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn students_with_class(conn: &Connection) -> rusqlite::Result<Vec<StudentListing>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.name, u.surname, u.email, c.name
         FROM users u
         LEFT JOIN classes c ON u.class_id = c.id
         WHERE u.role = 'student'",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(StudentListing {
            id: r.get(0)?,
            name: r.get(1)?,
            surname: r.get(2)?,
            email: r.get(3)?,
            class_name: r.get(4)?,
        })
    })?;
    rows.collect()
}

pub fn create_class(conn: &Connection, name: &str, year: i64) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO classes (name, year) VALUES (?, ?)",
        params![name, year],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_subject(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO subjects (name) VALUES (?)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn create_assignment(
    conn: &Connection,
    professor_id: i64,
    subject_id: i64,
    class_id: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO professor_assignments (professor_id, subject_id, class_id) VALUES (?, ?, ?)",
        params![professor_id, subject_id, class_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_attendance(
    conn: &Connection,
    student_id: i64,
    date: &str,
    status: AttendanceStatus,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO attendance (student_id, date, status) VALUES (?, ?, ?)",
        params![student_id, date, status],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_news(
    conn: &Connection,
    title: &str,
    content: &str,
    date: &str,
    category: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO news (title, content, date, category) VALUES (?, ?, ?, ?)",
        params![title, content, date, category],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The stored credential is salted and hashed before it touches the store.
/// A duplicate email surfaces as the store's unique-constraint failure.
pub fn create_user(conn: &Connection, user: &NewUser) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (email, password, role, name, surname, dob, year, class_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            user.email,
            auth::hash_password(&user.password),
            user.role,
            user.name,
            user.surname,
            user.dob,
            user.year,
            user.class_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Cascading delete: the user's grades, attendance and assignment rows go with
/// the user row, children first so foreign keys hold, all inside one
/// transaction. Absent ids delete nothing and still succeed.
pub fn delete_user(conn: &Connection, user_id: i64) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM grades WHERE student_id = ?", [user_id])?;
    tx.execute("DELETE FROM attendance WHERE student_id = ?", [user_id])?;
    tx.execute(
        "DELETE FROM professor_assignments WHERE professor_id = ?",
        [user_id],
    )?;
    tx.execute("DELETE FROM users WHERE id = ?", [user_id])?;
    tx.commit()
}
