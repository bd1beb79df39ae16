use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use depot_common::Credits;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role         ---------------------------------------------------------
/// The privilege level of an account. Only admins may view the dashboard, change order statuses or manage users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------   OfferCategory     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferCategory {
    Food,
    Medicine,
}

impl Display for OfferCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferCategory::Food => write!(f, "food"),
            OfferCategory::Medicine => write!(f, "medicine"),
        }
    }
}

impl FromStr for OfferCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "medicine" => Ok(Self::Medicine),
            _ => Err(ConversionError(format!("Invalid offer category: {s}"))),
        }
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// Order statuses form a flat set. Apart from `Pending`, which is only ever set at checkout, an admin may move an
/// order from any status to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed and stock has been reserved.
    Pending,
    Preparing,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 5] = [
        OrderStatusType::Pending,
        OrderStatusType::Preparing,
        OrderStatusType::Processing,
        OrderStatusType::Shipped,
        OrderStatusType::Delivered,
    ];

    /// Whether an admin may set this status on an existing order.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, OrderStatusType::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "pending"),
            OrderStatusType::Preparing => write!(f, "preparing"),
            OrderStatusType::Processing => write!(f, "processing"),
            OrderStatusType::Shipped => write!(f, "shipped"),
            OrderStatusType::Delivered => write!(f, "delivered"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------     UserAccount     ---------------------------------------------------------
#[derive(Clone, FromRow, Serialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The only session token that is currently honoured for this account. Logging in replaces it.
    #[serde(skip_serializing)]
    pub current_token: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("has_session", &self.current_token.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

//--------------------------------------        Offer        ---------------------------------------------------------
/// A stocked supply item. `quantity` is never negative; the store enforces this with a check constraint.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: i64,
    pub name: String,
    pub category: OfferCategory,
    pub quantity: i64,
    pub price: Credits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOffer {
    pub name: String,
    pub category: OfferCategory,
    pub quantity: i64,
    pub price: Credits,
}

impl NewOffer {
    pub fn new<S: Into<String>>(name: S, category: OfferCategory, quantity: i64, price: Credits) -> Self {
        Self { name: name.into(), category, quantity, price }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatusType,
    pub total: Credits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub lines: Vec<OrderLine>,
}

/// One line of an order. `unit_price` is the offer's price at checkout and never changes afterwards.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub offer_id: i64,
    pub quantity: i64,
    pub unit_price: Credits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub offer_id: i64,
    pub quantity: i64,
    pub unit_price: Credits,
}

//--------------------------------------      CartItem       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub offer_id: i64,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(offer_id: i64, quantity: i64) -> Self {
        Self { offer_id, quantity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    pub order_id: i64,
    pub total: Credits,
    pub status: OrderStatusType,
}
