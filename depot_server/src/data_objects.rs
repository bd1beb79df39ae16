//! Request and response bodies of the HTTP API.
//!
//! Field names follow the wire format that clients already use (`orderItems`, `productID`, `orderID`), so several
//! structs rename their fields on the way in or out.
use std::fmt::Display;

use actix_web::http::StatusCode;
use depot_engine::{
    db_types::{CartItem, Credits, Offer, Order, OrderStatusType, Role, UserAccount},
    order_objects::DashboardMetrics,
};
use serde::{Deserialize, Serialize};

/// The body of every error response, and of responses that only need to say that something worked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub code: u16,
    pub message: String,
}

impl JsonResponse {
    pub fn new<S: Display>(status: StatusCode, message: S) -> Self {
        Self { code: status.as_u16(), message: message.to_string() }
    }

    pub fn success<S: Display>(message: S) -> Self {
        Self::new(StatusCode::OK, message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersResponse {
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CheckoutItem {
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub quantity: i64,
}

impl From<CheckoutItem> for CartItem {
    fn from(item: CheckoutItem) -> Self {
        CartItem::new(item.product_id, item.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "orderItems")]
    pub order_items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    pub fn cart(&self) -> Vec<CartItem> {
        self.order_items.iter().copied().map(CartItem::from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    pub total: Credits,
    pub status: OrderStatusType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub status: OrderStatusType,
}

/// The body of `PATCH /admin/orders/{id}`. The status is kept as a string so that unknown values can be reported as
/// an invalid status rather than as a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub dashboard: DashboardMetrics,
    pub offers: Vec<Offer>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    pub email: String,
    pub role: Role,
}
