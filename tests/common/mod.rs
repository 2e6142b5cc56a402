#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::json;

use schoold::http::routes;
use schoold::http::types::AppState;
use schoold::{db, seed};

/// Fresh seeded in-memory store per test.
pub fn test_state() -> web::Data<AppState> {
    let conn = db::open_in_memory().expect("open in-memory store");
    seed::seed_if_empty(&conn).expect("seed demo data");
    web::Data::new(AppState::new(conn))
}

pub fn create_app(
    state: &web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state.clone())
        .configure(routes::configure)
}

/// Login and return the response body: the profile plus the session token.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> serde_json::Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(
        resp.status().is_success(),
        "login failed for {} with {}",
        email,
        resp.status()
    );
    test::read_body_json(resp).await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub async fn get<S, B>(app: &S, uri: &str, token: &str) -> (StatusCode, serde_json::Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

pub async fn post_json<S, B>(
    app: &S,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

pub async fn delete<S, B>(app: &S, uri: &str, token: &str) -> (StatusCode, serde_json::Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::delete()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

pub fn token_of(login_body: &serde_json::Value) -> String {
    login_body["token"]
        .as_str()
        .expect("login body carries a token")
        .to_string()
}

pub fn id_of(login_body: &serde_json::Value) -> i64 {
    login_body["id"].as_i64().expect("login body carries an id")
}
