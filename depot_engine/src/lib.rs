//! Depot Engine
//!
//! The depot engine holds the core logic of the supply depot: a small inventory of food and medicine offers, an
//! atomic checkout that turns a cart into an order, the order lifecycle that admins drive afterwards, and the user
//! accounts that sessions are issued against. It is transport-agnostic; the HTTP surface lives in `depot_server`.
//!
//! The library is divided into two main sections:
//! 1. Backend contracts and storage. The [`traits`] module defines what a backend must provide, and
//!    [`SqliteDatabase`] is the SQLite implementation. You should never need to access the database directly. The
//!    exception is the data types used in the database. These are defined in the [`db_types`] module and are public.
//! 2. The engine public API ([`mod@depot_api`]). Each API wraps a backend that implements the traits it needs:
//!    [`AccountApi`], [`AuthApi`], [`InventoryApi`], [`CheckoutApi`] and [`OrderLifecycleApi`].
//!
//! All shared mutable state (stock levels, orders, session tokens) lives in the store. Instances of the APIs hold no
//! state of their own, so each server worker can own a set of them over a cloned backend handle.
pub mod db_types;
pub mod helpers;
pub mod traits;

mod depot_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use depot_api::{
    accounts_api::AccountApi,
    auth_api::AuthApi,
    checkout_api::CheckoutApi,
    inventory_api::InventoryApi,
    order_lifecycle_api::OrderLifecycleApi,
    order_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};
pub use traits::{
    AccountApiError,
    AccountManagement,
    AuthApiError,
    AuthManagement,
    CheckoutError,
    InventoryApiError,
    InventoryManagement,
    OrderApiError,
    OrderManagement,
    StatusTally,
};
