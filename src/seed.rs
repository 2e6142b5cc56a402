use rusqlite::Connection;

use crate::calc::AttendanceStatus;
use crate::policy::Role;
use crate::repo::{self, NewUser};

pub const SUBJECTS: [&str; 12] = [
    "Matematikë",
    "Gjuhë Shqipe",
    "Gjuhë Angleze",
    "Fizikë",
    "Kimi",
    "Biologji",
    "Histori",
    "Gjeografi",
    "Informatikë",
    "Edukatë Fizike",
    "Sociologji",
    "Filozofi",
];

fn new_student(
    email: &str,
    name: &str,
    surname: &str,
    dob: &str,
    year: i64,
    class_id: i64,
) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "student123".to_string(),
        role: Role::Student,
        name: name.to_string(),
        surname: surname.to_string(),
        dob: Some(dob.to_string()),
        year: Some(year),
        class_id: Some(class_id),
    }
}

/// Demo data, inserted exactly once: the gate is the users table being empty,
/// so an initialized store is never reseeded. The whole seed runs in a single
/// transaction.
pub fn seed_if_empty(conn: &Connection) -> anyhow::Result<bool> {
    if repo::user_count(conn)? > 0 {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;

    repo::create_user(
        &tx,
        &NewUser {
            email: "admin@school.edu".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
            name: "Admin".to_string(),
            surname: "User".to_string(),
            dob: None,
            year: None,
            class_id: None,
        },
    )?;

    // Three classes per year, named "1-1" .. "4-3".
    let mut class_ids = Vec::new();
    for y in 1..=4 {
        for c in 1..=3 {
            class_ids.push(repo::create_class(&tx, &format!("{}-{}", y, c), y)?);
        }
    }

    let mut subject_ids = Vec::new();
    for name in SUBJECTS {
        subject_ids.push(repo::create_subject(&tx, name)?);
    }

    let prof_id = repo::create_user(
        &tx,
        &NewUser {
            email: "prof@school.edu".to_string(),
            password: "prof123".to_string(),
            role: Role::Professor,
            name: "Arben".to_string(),
            surname: "Krasniqi".to_string(),
            dob: None,
            year: None,
            class_id: None,
        },
    )?;
    repo::create_assignment(&tx, prof_id, subject_ids[0], class_ids[0])?;
    repo::create_assignment(&tx, prof_id, subject_ids[0], class_ids[6])?;

    let student_id = repo::create_user(
        &tx,
        &new_student(
            "student@school.edu",
            "Driton",
            "Berisha",
            "2008-05-15",
            3,
            class_ids[6],
        ),
    )?;

    let names = ["Agim", "Besa", "Fatmir", "Gresa", "Ilir"];
    let surnames = ["Hoxha", "Gashi", "Leka", "Rama", "Zeka"];
    for i in 0..names.len() {
        repo::create_user(
            &tx,
            &new_student(
                &format!("student_3_1_{}@school.edu", i),
                names[i],
                surnames[i],
                "2008-06-20",
                3,
                class_ids[6],
            ),
        )?;
    }

    let names = ["Luan", "Teuta", "Valon", "Zana"];
    let surnames = ["Krasniqi", "Morina", "Shala", "Bytyqi"];
    for i in 0..names.len() {
        repo::create_user(
            &tx,
            &new_student(
                &format!("student_1_1_{}@school.edu", i),
                names[i],
                surnames[i],
                "2010-09-10",
                1,
                class_ids[0],
            ),
        )?;
    }

    // A few grades in the first two sections for the demo student.
    for (i, sid) in subject_ids.iter().take(5).enumerate() {
        repo::create_grade(&tx, student_id, *sid, 1, 4 + (i as i64 % 2))?;
        repo::create_grade(&tx, student_id, *sid, 1, 5)?;
        repo::create_grade(&tx, student_id, *sid, 2, 4)?;
    }

    for date in [
        "2025-09-01",
        "2025-09-02",
        "2025-09-03",
        "2025-09-04",
        "2025-09-05",
    ] {
        repo::create_attendance(&tx, student_id, date, AttendanceStatus::Present)?;
    }
    repo::create_attendance(&tx, student_id, "2025-09-08", AttendanceStatus::Absent)?;

    repo::create_news(
        &tx,
        "Mirësevini në SHMK Gjimnazi \"Sami Frashëri\"",
        "Viti i ri shkollor fillon me sukses. Mirësevini në uebfaqen tonë të re bashkëkohore!",
        "2025-08-25",
        "Lajme",
    )?;

    tx.commit()?;
    Ok(true)
}
