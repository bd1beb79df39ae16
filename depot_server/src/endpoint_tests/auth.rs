use actix_web::{http::StatusCode, test::TestRequest};
use depot_engine::{
    db_types::{Role, UserAccount},
    helpers::hash_password,
    traits::AccountApiError,
    AuthApi,
};
use serde_json::json;

use super::{helpers::*, mocks::MockBackend};
use crate::{auth::SessionManager, data_objects::LoginResponse};

fn registered(email: &str, password: &str) -> UserAccount {
    UserAccount { password_hash: hash_password(password).unwrap(), ..account(3, email, Role::User) }
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = send(Backends::default(), TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn unknown_route() {
    let (status, body) = send(Backends::default(), TestRequest::get().uri("/auth/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.starts_with(r#"{"code":404,"#), "was: {body}");
}

#[actix_web::test]
async fn register_new_user() {
    let mut backends = Backends::default();
    backends
        .accounts
        .expect_create_account()
        .withf(|a| a.username == "ada" && a.email == "ada@example.com" && a.role == Role::User)
        .times(1)
        .returning(|a| Ok(UserAccount { password_hash: a.password_hash, ..account(3, &a.email, a.role) }));
    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "correct horse battery staple"
    }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"code":201,"message":"Account ada created"}"#);
}

#[actix_web::test]
async fn register_hashes_the_password() {
    let mut backends = Backends::default();
    backends
        .accounts
        .expect_create_account()
        .withf(|a| a.password_hash.starts_with("$argon2") && !a.password_hash.contains("hunter22"))
        .times(1)
        .returning(|a| Ok(account(3, &a.email, a.role)));
    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "hunter22"
    }));
    let (status, _) = send(backends, req).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn register_duplicate_user() {
    let mut backends = Backends::default();
    backends.accounts.expect_create_account().returning(|_| Err(AccountApiError::AccountAlreadyExists));
    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "hunter22"
    }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already exists"), "was: {body}");
}

#[actix_web::test]
async fn register_invalid_fields() {
    for (username, email, password) in [("", "ada@example.com", "pw"), ("ada", "no-at-sign", "pw"), ("ada", "a@b", "")] {
        let mut backends = Backends::default();
        backends.accounts.expect_create_account().never();
        let req = TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "username": username, "email": email, "password": password }));
        let (status, body) = send(backends, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "was: {body}");
    }
}

#[actix_web::test]
async fn register_malformed_body() {
    let req = TestRequest::post()
        .uri("/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"username": "ada""#);
    let (status, body) = send(Backends::default(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"code":400,"message":"Could not read request body"#), "was: {body}");
}

#[actix_web::test]
async fn login_issues_and_records_a_token() {
    let mut backends = Backends::default();
    let ada = registered("ada@example.com", "hunter22");
    backends.accounts.expect_fetch_account_by_email().returning(move |_| Ok(Some(ada.clone())));
    backends.auth.expect_set_current_token().withf(|id, token| *id == 3 && !token.is_empty()).times(1).returning(|_, _| Ok(()));
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "hunter22" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    let response: LoginResponse = serde_json::from_str(&body).unwrap();
    let sessions = SessionManager::new(&auth_config(), AuthApi::new(MockBackend::new()));
    let claims = sessions.validate_token(&response.token).unwrap();
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.role, Role::User);
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let mut backends = Backends::default();
    let ada = registered("ada@example.com", "hunter22");
    backends.accounts.expect_fetch_account_by_email().returning(move |_| Ok(Some(ada.clone())));
    backends.auth.expect_set_current_token().never();
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "hunter2" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"code":401,"message":"Invalid email or password"}"#);
}

#[actix_web::test]
async fn login_with_unknown_email() {
    let mut backends = Backends::default();
    backends.accounts.expect_fetch_account_by_email().returning(|_| Ok(None));
    backends.auth.expect_set_current_token().never();
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "hunter22" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"code":401,"message":"Invalid email or password"}"#);
}

#[actix_web::test]
async fn login_when_the_store_fails() {
    let mut backends = Backends::default();
    backends
        .accounts
        .expect_fetch_account_by_email()
        .returning(|_| Err(AccountApiError::DatabaseError("disk I/O error".into())));
    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "hunter22" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"code":500,"message":"Internal server error"}"#);
}
