use rusqlite::Connection;

use schoold::policy::Role;
use schoold::repo;
use schoold::{db, seed};

fn seeded_store() -> Connection {
    let conn = db::open_in_memory().expect("open in-memory store");
    seed::seed_if_empty(&conn).expect("seed demo data");
    conn
}

fn demo_student_id(conn: &Connection) -> i64 {
    repo::authenticate(conn, "student@school.edu", "student123")
        .expect("query")
        .expect("seeded student")
        .id
}

#[test]
fn seed_runs_exactly_once() {
    let conn = seeded_store();
    let before = repo::user_count(&conn).expect("count");
    assert!(before > 0);
    assert!(!seed::seed_if_empty(&conn).expect("second seed is a no-op"));
    assert_eq!(repo::user_count(&conn).expect("count"), before);
}

#[test]
fn authenticate_checks_exact_credentials() {
    let conn = seeded_store();

    let profile = repo::authenticate(&conn, "student@school.edu", "student123")
        .expect("query")
        .expect("valid credentials resolve");
    assert_eq!(profile.role, Role::Student);
    assert_eq!(profile.class_name.as_deref(), Some("3-1"));

    for (email, password) in [
        ("student@school.edu", "wrong"),
        ("student@school.edu", "Student123"),
        ("Student@school.edu", "student123"),
        ("", ""),
    ] {
        assert!(
            repo::authenticate(&conn, email, password)
                .expect("query")
                .is_none(),
            "{email}/{password} must be rejected"
        );
    }
}

#[test]
fn stored_credentials_are_hashed() {
    let conn = seeded_store();
    let stored: String = conn
        .query_row(
            "SELECT password FROM users WHERE email = 'student@school.edu'",
            [],
            |r| r.get(0),
        )
        .expect("stored credential");
    assert!(!stored.contains("student123"));
    assert!(stored.contains('$'));
}

#[test]
fn cascade_delete_leaves_no_orphans() {
    let conn = seeded_store();
    let student_id = demo_student_id(&conn);

    let orphan_count = |conn: &Connection, sql: &str| -> i64 {
        conn.query_row(sql, [student_id], |r| r.get(0)).expect("count")
    };

    assert!(orphan_count(&conn, "SELECT COUNT(*) FROM grades WHERE student_id = ?") > 0);
    assert!(orphan_count(&conn, "SELECT COUNT(*) FROM attendance WHERE student_id = ?") > 0);

    repo::delete_user(&conn, student_id).expect("cascade delete");

    assert_eq!(
        orphan_count(&conn, "SELECT COUNT(*) FROM grades WHERE student_id = ?"),
        0
    );
    assert_eq!(
        orphan_count(&conn, "SELECT COUNT(*) FROM attendance WHERE student_id = ?"),
        0
    );
    assert_eq!(
        orphan_count(
            &conn,
            "SELECT COUNT(*) FROM professor_assignments WHERE professor_id = ?"
        ),
        0
    );
    assert!(repo::profile(&conn, student_id).expect("query").is_none());

    // A second delete of the same id is a successful no-op.
    repo::delete_user(&conn, student_id).expect("repeat delete");
}

#[test]
fn cascade_delete_of_a_professor_removes_their_assignments() {
    let conn = seeded_store();
    let prof = repo::authenticate(&conn, "prof@school.edu", "prof123")
        .expect("query")
        .expect("seeded professor");

    assert_eq!(repo::teaching_pairs(&conn, prof.id).expect("pairs").len(), 2);
    repo::delete_user(&conn, prof.id).expect("cascade delete");
    assert!(repo::teaching_pairs(&conn, prof.id).expect("pairs").is_empty());
}

#[test]
fn grade_delete_is_idempotent() {
    let conn = seeded_store();
    let student_id = demo_student_id(&conn);
    let grade_id = repo::create_grade(&conn, student_id, 1, 4, 5).expect("create grade");

    let before = repo::grade_count(&conn).expect("count");
    assert_eq!(repo::delete_grade(&conn, grade_id).expect("delete"), 1);
    assert_eq!(repo::grade_count(&conn).expect("count"), before - 1);

    assert_eq!(repo::delete_grade(&conn, grade_id).expect("repeat delete"), 0);
    assert_eq!(repo::grade_count(&conn).expect("count"), before - 1);
}

#[test]
fn subject_filter_returns_only_matching_grades() {
    let conn = seeded_store();
    let student_id = demo_student_id(&conn);

    // The demo student has seeded grades in subjects 1..=5; add one more in
    // subject 2 to make the filter visible.
    repo::create_grade(&conn, student_id, 2, 4, 3).expect("create grade");

    let filtered = repo::grades_for_student_in_subject(&conn, student_id, 1).expect("filtered");
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|g| g.subject_id == 1));

    let filtered = repo::grades_for_student_in_subject(&conn, student_id, 2).expect("filtered");
    assert_eq!(filtered.len(), 4);
}

#[test]
fn staff_directory_folds_subjects_per_professor() {
    let conn = seeded_store();
    let prof = repo::authenticate(&conn, "prof@school.edu", "prof123")
        .expect("query")
        .expect("seeded professor");

    // Second subject in an already-assigned class: the professor still shows
    // up once, with both subject names.
    repo::create_assignment(&conn, prof.id, 2, 1).expect("assignment");

    let staff = repo::staff_directory(&conn).expect("staff");
    let prof_rows: Vec<_> = staff.iter().filter(|s| s.id == prof.id).collect();
    assert_eq!(prof_rows.len(), 1);
    assert!(prof_rows[0].subjects.contains("Matematikë"));
    assert!(prof_rows[0].subjects.contains("Gjuhë Shqipe"));

    let admin = staff
        .iter()
        .find(|s| s.role == Role::Admin)
        .expect("admin in staff");
    assert_eq!(admin.subjects, "");
}

#[test]
fn profile_of_a_classless_user_has_empty_class_fields() {
    let conn = seeded_store();
    let prof = repo::authenticate(&conn, "prof@school.edu", "prof123")
        .expect("query")
        .expect("seeded professor");
    let profile = repo::profile(&conn, prof.id).expect("query").expect("profile");
    assert!(profile.class_id.is_none());
    assert!(profile.class_name.is_none());
}

#[test]
fn duplicate_email_fails_without_partial_state() {
    let conn = seeded_store();
    let before = repo::user_count(&conn).expect("count");

    let err = repo::create_user(
        &conn,
        &repo::NewUser {
            email: "student@school.edu".to_string(),
            password: "other".to_string(),
            role: Role::Student,
            name: "Dy".to_string(),
            surname: "Herë".to_string(),
            dob: None,
            year: None,
            class_id: None,
        },
    );
    assert!(err.is_err());
    assert_eq!(repo::user_count(&conn).expect("count"), before);
}
