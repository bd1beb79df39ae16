//! # Depot engine public API
//!
//! The `depot_api` module exposes the programmatic API of the depot engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`accounts_api`] registers accounts, verifies credentials and manages roles.
//! * [`auth_api`] tracks the single live session token of each account.
//! * [`inventory_api`] lists and seeds the stocked offers.
//! * [`checkout_api`] turns a cart into an order in one atomic step.
//! * [`order_lifecycle_api`] reads and advances order statuses and computes the admin dashboard.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API.
//!
//! ```rust,ignore
//! use depot_engine::{CheckoutApi, SqliteDatabase, db_types::CartItem};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = CheckoutApi::new(db);
//! let result = api.checkout(&[CartItem::new(1, 2)]).await?;
//! ```

pub mod accounts_api;
pub mod auth_api;
pub mod checkout_api;
pub mod inventory_api;
pub mod order_lifecycle_api;
pub mod order_objects;
