use actix_web::{http::StatusCode, test::TestRequest};
use chrono::Utc;
use depot_engine::{
    db_types::{Credits, Order, OrderStatusType, Role},
    traits::StatusTally,
};
use serde_json::json;

use super::helpers::*;

fn tally(status: OrderStatusType, count: i64, revenue: i64) -> StatusTally {
    StatusTally { status, count, revenue: Credits::from(revenue) }
}

fn admin() -> (Backends, String) {
    Backends::default().logged_in("root@example.com", Role::Admin)
}

#[actix_web::test]
async fn dashboard_for_a_user() {
    let (mut backends, token) = Backends::default().logged_in("ada@example.com", Role::User);
    backends.orders.expect_fetch_status_tallies().never();
    backends.orders.expect_fetch_orders().never();
    backends.inventory.expect_fetch_offers().never();
    let (status, body) = send(backends, with_token(TestRequest::get().uri("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"code":403,"message":"Forbidden"}"#);
}

#[actix_web::test]
async fn dashboard_without_credential() {
    let (status, body) = send(Backends::default(), TestRequest::get().uri("/admin/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"code":401,"message":"Unauthorized"}"#);
}

#[actix_web::test]
async fn dashboard_for_an_admin() {
    let (mut backends, token) = admin();
    backends.orders.expect_fetch_status_tallies().returning(|| {
        Ok(vec![tally(OrderStatusType::Pending, 1, 10), tally(OrderStatusType::Delivered, 2, 50)])
    });
    backends.orders.expect_fetch_orders().returning(|| {
        let now = Utc::now();
        Ok(vec![Order {
            id: 1,
            status: OrderStatusType::Pending,
            total: Credits::from(10),
            created_at: now,
            updated_at: now,
            lines: vec![],
        }])
    });
    backends.inventory.expect_fetch_offers().returning(|| Ok(vec![]));
    let (status, body) = send(backends, with_token(TestRequest::get().uri("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let dashboard = &body["dashboard"];
    assert_eq!(dashboard["total_orders"], 3);
    assert_eq!(dashboard["total_revenue"], 60);
    assert_eq!(dashboard["pending_orders"], 1);
    assert_eq!(dashboard["delivered_orders"], 2);
    assert_eq!(dashboard["shipped_orders"], 0);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    assert!(body["offers"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn update_order_status() {
    let (mut backends, token) = admin();
    backends
        .orders
        .expect_update_order_status()
        .withf(|id, status| *id == 5 && *status == OrderStatusType::Shipped)
        .times(1)
        .returning(|id, status| {
            let now = Utc::now();
            Ok(Some(Order { id, status, total: Credits::from(10), created_at: now, updated_at: now, lines: vec![] }))
        });
    let req = with_token(TestRequest::patch().uri("/admin/orders/5"), &token).set_json(json!({ "status": "shipped" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    assert_eq!(body, r#"{"status":"shipped"}"#);
}

#[actix_web::test]
async fn update_order_status_to_unassignable_values() {
    for value in ["cancelled", "pending", "SHIPPED!", ""] {
        let (mut backends, token) = admin();
        backends.orders.expect_update_order_status().never();
        let req = with_token(TestRequest::patch().uri("/admin/orders/5"), &token).set_json(json!({ "status": value }));
        let (status, body) = send(backends, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{value} was accepted: {body}");
        assert!(body.contains("Invalid order status"), "was: {body}");
    }
}

#[actix_web::test]
async fn update_status_of_unknown_order() {
    let (mut backends, token) = admin();
    backends.orders.expect_update_order_status().returning(|_, _| Ok(None));
    let req =
        with_token(TestRequest::patch().uri("/admin/orders/404"), &token).set_json(json!({ "status": "delivered" }));
    let (status, _) = send(backends, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_order_status_as_a_user() {
    let (mut backends, token) = Backends::default().logged_in("ada@example.com", Role::User);
    backends.orders.expect_update_order_status().never();
    let req = with_token(TestRequest::patch().uri("/admin/orders/5"), &token).set_json(json!({ "status": "shipped" }));
    let (status, _) = send(backends, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn list_users_hides_secrets() {
    let (mut backends, token) = admin();
    backends.accounts.expect_fetch_accounts().returning(|| {
        Ok(vec![account(1, "root@example.com", Role::Admin), account(2, "ada@example.com", Role::User)])
    });
    let (status, body) = send(backends, with_token(TestRequest::get().uri("/admin/users"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("password_hash"), "was: {body}");
    assert!(!body.contains("current_token"), "was: {body}");
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1]["email"], "ada@example.com");
    assert_eq!(users[1]["role"], "user");
}

#[actix_web::test]
async fn delete_user() {
    let (mut backends, token) = admin();
    backends
        .accounts
        .expect_delete_account_by_email()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .returning(|_| Ok(true));
    let req = with_token(TestRequest::delete().uri("/admin/users"), &token).set_json(json!({ "email": "ada@example.com" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"code":200,"message":"Account ada@example.com deleted"}"#);
}

#[actix_web::test]
async fn delete_unknown_user() {
    let (mut backends, token) = admin();
    backends.accounts.expect_delete_account_by_email().returning(|_| Ok(false));
    let req =
        with_token(TestRequest::delete().uri("/admin/users"), &token).set_json(json!({ "email": "nobody@example.com" }));
    let (status, _) = send(backends, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn promote_user() {
    let (mut backends, token) = admin();
    backends
        .accounts
        .expect_set_role_for_email()
        .withf(|email, role| email == "ada@example.com" && *role == Role::Admin)
        .times(1)
        .returning(|email, role| Ok(Some(account(2, email, role))));
    let req = with_token(TestRequest::patch().uri("/admin/users/role"), &token)
        .set_json(json!({ "email": "ada@example.com", "role": "admin" }));
    let (status, body) = send(backends, req).await;
    assert_eq!(status, StatusCode::OK, "was: {body}");
    assert!(body.contains("ada@example.com now has the admin role"), "was: {body}");
}

#[actix_web::test]
async fn set_unknown_role() {
    let (mut backends, token) = admin();
    backends.accounts.expect_set_role_for_email().never();
    let req = with_token(TestRequest::patch().uri("/admin/users/role"), &token)
        .set_json(json!({ "email": "ada@example.com", "role": "superuser" }));
    let (status, _) = send(backends, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
