use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

use crate::db_types::{CartItem, CheckoutResult, Credits, Order, OrderStatusType};

/// Reasons a checkout is rejected. Whatever the reason, a rejected checkout leaves no trace in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("The cart is empty")]
    EmptyCart,
    #[error("Invalid quantity requested for item {0}")]
    InvalidQuantity(i64),
    #[error("Item {0} does not exist")]
    UnknownItem(i64),
    #[error("Not enough stock to fulfil the request for item {0}")]
    InsufficientStock(i64),
    #[error("The order total is too large")]
    TotalOverflow,
    #[error("The store did not respond in time. Please retry.")]
    StoreTimeout,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl CheckoutError {
    /// Rejections caused by the cart's contents, as opposed to the store.
    pub fn is_rejection(&self) -> bool {
        use CheckoutError::*;
        matches!(self, EmptyCart | InvalidQuantity(_) | UnknownItem(_) | InsufficientStock(_) | TotalOverflow)
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        if super::is_store_timeout(&e) {
            CheckoutError::StoreTimeout
        } else {
            CheckoutError::DatabaseError(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The store did not respond in time. Please retry.")]
    StoreTimeout,
    #[error("Order #{0} does not exist")]
    OrderNotFound(i64),
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        if super::is_store_timeout(&e) {
            OrderApiError::StoreTimeout
        } else {
            OrderApiError::DatabaseError(e.to_string())
        }
    }
}

/// Order count and revenue for one status, as produced by a single grouped query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct StatusTally {
    pub status: OrderStatusType,
    pub count: i64,
    pub revenue: Credits,
}

/// The `OrderManagement` trait covers placing orders and everything that happens to them afterwards.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Places an order for the cart in one atomic unit.
    ///
    /// For each line, in cart order, the line's quantity must be positive, the offer must exist, and the offer must
    /// have at least that many units in stock; the first failing line determines the error. When all lines pass,
    /// every offer's stock is decremented, and an order with status `pending` is stored together with its lines,
    /// each priced at the offer's current unit price. When any line fails, nothing is changed.
    async fn checkout(&self, cart: &[CartItem]) -> Result<CheckoutResult, CheckoutError>;

    /// Fetches an order and its lines.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError>;

    /// Fetches every order with its lines, ordered by id.
    async fn fetch_orders(&self) -> Result<Vec<Order>, OrderApiError>;

    /// Overwrites the order's status. Returns `None` if the order does not exist.
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatusType,
    ) -> Result<Option<Order>, OrderApiError>;

    /// Order counts and revenue grouped by status. Statuses with no orders are omitted.
    async fn fetch_status_tallies(&self) -> Result<Vec<StatusTally>, OrderApiError>;
}
