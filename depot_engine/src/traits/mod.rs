//! # Backend contracts
//!
//! This module defines the interfaces that a storage *backend* must expose in order to drive the depot engine.
//! Each concern gets its own trait so that API wrappers and tests can depend on exactly what they use.
//!
//! * [`AccountManagement`] creates, lists, deletes and re-roles user accounts.
//! * [`AuthManagement`] tracks the single live session token of each account.
//! * [`InventoryManagement`] lists and seeds the stocked offers.
//! * [`OrderManagement`] performs the atomic checkout and the order lifecycle queries.
//!
//! Every error type here distinguishes a `StoreTimeout` from other storage failures, so that the server can tell
//! a client to retry rather than report an internal error.
mod account_management;
mod auth_management;
mod inventory_management;
mod order_management;

pub use account_management::{AccountApiError, AccountManagement};
pub use auth_management::{AuthApiError, AuthManagement};
pub use inventory_management::{InventoryApiError, InventoryManagement};
pub use order_management::{CheckoutError, OrderApiError, OrderManagement, StatusTally};

/// SQLite result codes for SQLITE_BUSY, SQLITE_LOCKED and their extended forms.
const LOCK_CONTENTION_CODES: [&str; 6] = ["5", "6", "261", "262", "517", "773"];

/// True if the store rejected the statement because another writer holds the lock.
fn is_lock_contention(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            db_err.code().map(|code| LOCK_CONTENTION_CODES.contains(&&*code)).unwrap_or(false)
        },
        _ => false,
    }
}

/// True if the store could not serve the request within the configured bound, either because no pooled connection
/// became free or because the write lock stayed busy.
pub(crate) fn is_store_timeout(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::PoolTimedOut) || is_lock_contention(e)
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
