//! Full request flows against a real SQLite store.
use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
    test::TestRequest,
    App,
    Error,
};
use actix_http::Request;
use depot_engine::{
    db_types::{Credits, NewOffer, OfferCategory},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    AccountApi,
    InventoryApi,
    SqliteDatabase,
};
use serde_json::{json, Value};

use super::helpers::auth_config;
use crate::{data_objects::LoginResponse, server::configure_routes};

async fn app(db: &SqliteDatabase) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let db = db.clone();
    let auth = auth_config();
    test::init_service(App::new().configure(move |cfg| configure_routes(cfg, db, &auth))).await
}

async fn call<S>(app: &S, req: TestRequest) -> (StatusCode, Value)
where S: Service<Request, Response = ServiceResponse, Error = Error> {
    let res = match test::try_call_service(app, req.to_request()).await {
        Ok(res) => res,
        Err(e) => {
            let status = e.as_response_error().status_code();
            return (status, json!({ "code": status.as_u16() }));
        },
    };
    let status = res.status();
    let body = test::read_body(res).await;
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, body)
}

async fn login<S>(app: &S, email: &str, password: &str) -> String
where S: Service<Request, Response = ServiceResponse, Error = Error> {
    let req = TestRequest::post().uri("/auth/login").set_json(json!({ "email": email, "password": password }));
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    serde_json::from_value::<LoginResponse>(body).unwrap().token
}

fn authorized(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", token))
}

#[actix_web::test]
async fn only_the_latest_login_is_honoured() {
    let db = prepare_test_env(&random_db_path()).await;
    let app = app(&db).await;
    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "hunter22"
    }));
    let (status, _) = call(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let first = login(&app, "ada@example.com", "hunter22").await;
    let second = login(&app, "ada@example.com", "hunter22").await;
    assert_ne!(first, second);

    let (status, _) = call(&app, authorized(TestRequest::get().uri("/auth/offers"), &first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = call(&app, authorized(TestRequest::get().uri("/auth/offers"), &second)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["offers"].as_array().unwrap().is_empty());
    db.close().await;
}

#[actix_web::test]
async fn checkout_then_ship() {
    let db = prepare_test_env(&random_db_path()).await;
    let inventory = InventoryApi::new(db.clone());
    let rations = inventory.upsert_offer(NewOffer::new("Rations", OfferCategory::Food, 3, Credits::from(10))).await.unwrap();
    let bandages =
        inventory.upsert_offer(NewOffer::new("Bandages", OfferCategory::Medicine, 5, Credits::from(5))).await.unwrap();
    AccountApi::new(db.clone()).ensure_admin("root", "root@example.com", "rootpassword").await.unwrap();
    let app = app(&db).await;

    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "hunter22"
    }));
    assert_eq!(call(&app, req).await.0, StatusCode::CREATED);
    let user = login(&app, "ada@example.com", "hunter22").await;
    let admin = login(&app, "root@example.com", "rootpassword").await;

    let cart = json!({ "orderItems": [
        { "productID": rations.id, "quantity": 2 },
        { "productID": bandages.id, "quantity": 1 }
    ]});
    let (status, body) = call(&app, authorized(TestRequest::post().uri("/auth/checkout"), &user).set_json(&cart)).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    assert_eq!(body["total"], 25);
    assert_eq!(body["status"], "pending");
    let order_id = body["orderID"].as_i64().unwrap();

    // Only one unit of rations is left, so the same cart is now refused and nothing else is taken.
    let (status, _) = call(&app, authorized(TestRequest::post().uri("/auth/checkout"), &user).set_json(&cart)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let offers = inventory.offers().await.unwrap();
    assert_eq!(offers[0].quantity, 1);
    assert_eq!(offers[1].quantity, 4);

    let (status, _) = call(&app, authorized(TestRequest::get().uri("/admin/dashboard"), &user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/admin/orders/{order_id}");
    let req = authorized(TestRequest::patch().uri(&uri), &admin).set_json(json!({ "status": "shipped" }));
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");

    let uri = format!("/auth/orders/{order_id}");
    let (status, body) = call(&app, authorized(TestRequest::get().uri(&uri), &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "shipped");

    let (status, body) = call(&app, authorized(TestRequest::get().uri("/admin/dashboard"), &admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dashboard"]["total_orders"], 1);
    assert_eq!(body["dashboard"]["total_revenue"], 25);
    assert_eq!(body["dashboard"]["shipped_orders"], 1);
    assert_eq!(body["orders"][0]["lines"].as_array().unwrap().len(), 2);
    db.close().await;
}

#[actix_web::test]
async fn role_changes_apply_at_next_login() {
    let db = prepare_test_env(&random_db_path()).await;
    AccountApi::new(db.clone()).ensure_admin("root", "root@example.com", "rootpassword").await.unwrap();
    let app = app(&db).await;
    let req = TestRequest::post().uri("/auth/register").set_json(json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "hunter22"
    }));
    assert_eq!(call(&app, req).await.0, StatusCode::CREATED);
    let user = login(&app, "ada@example.com", "hunter22").await;
    let admin = login(&app, "root@example.com", "rootpassword").await;

    let req = authorized(TestRequest::patch().uri("/admin/users/role"), &admin)
        .set_json(json!({ "email": "ada@example.com", "role": "admin" }));
    assert_eq!(call(&app, req).await.0, StatusCode::OK);

    let (status, _) = call(&app, authorized(TestRequest::get().uri("/admin/users"), &user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let promoted = login(&app, "ada@example.com", "hunter22").await;
    let (status, body) = call(&app, authorized(TestRequest::get().uri("/admin/users"), &promoted)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let req = authorized(TestRequest::delete().uri("/admin/users"), &admin).set_json(json!({ "email": "ada@example.com" }));
    assert_eq!(call(&app, req).await.0, StatusCode::OK);
    let (status, _) = call(&app, authorized(TestRequest::get().uri("/auth/offers"), &promoted)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    db.close().await;
}
