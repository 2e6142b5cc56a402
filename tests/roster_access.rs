mod common;

use actix_web::http::StatusCode;
use actix_web::test;

#[actix_web::test]
async fn professor_sees_only_assigned_class_rosters() {
    let state = common::test_state();
    let app = test::init_service(common::create_app(&state)).await;

    let prof = common::login(&app, "prof@school.edu", "prof123").await;
    let token = common::token_of(&prof);
    let (_, assignments) = common::get(
        &app,
        &format!("/api/professor/{}/assignments", common::id_of(&prof)),
        &token,
    )
    .await;

    let assigned: Vec<i64> = assignments
        .as_array()
        .expect("assignments")
        .iter()
        .map(|a| a["class_id"].as_i64().expect("class id"))
        .collect();

    for class_id in &assigned {
        let (status, _) = common::get(&app, &format!("/api/class/{class_id}/students"), &token).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Any seeded class outside the assignment set is off limits.
    let unassigned = (1..=12).find(|c| !assigned.contains(c)).expect("unassigned class");
    let (status, _) = common::get(&app, &format!("/api/class/{unassigned}/students"), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn students_never_see_rosters() {
    let state = common::test_state();
    let app = test::init_service(common::create_app(&state)).await;

    let student = common::login(&app, "student@school.edu", "student123").await;
    let (status, _) = common::get(&app, "/api/class/7/students", &common::token_of(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_sees_every_roster() {
    let state = common::test_state();
    let app = test::init_service(common::create_app(&state)).await;

    let admin = common::login(&app, "admin@school.edu", "admin123").await;
    let token = common::token_of(&admin);

    let (status, roster) = common::get(&app, "/api/class/7/students", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().expect("roster").len(), 6);

    // An empty class is an empty roster, not an error.
    let (status, roster) = common::get(&app, "/api/class/12/students", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(roster.as_array().expect("roster").is_empty());
}
