use thiserror::Error;

use crate::db_types::UserAccount;

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The store did not respond in time. Please retry.")]
    StoreTimeout,
    #[error("Account #{0} does not exist")]
    AccountNotFound(i64),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        if super::is_store_timeout(&e) {
            AuthApiError::StoreTimeout
        } else {
            AuthApiError::DatabaseError(e.to_string())
        }
    }
}

/// Session bookkeeping. Each account has at most one current token; a token that is not the current one for some
/// account is stale, even if its signature and expiry are still valid.
#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Fetches the account whose current token is exactly `token`, if any.
    async fn fetch_account_by_token(&self, token: &str) -> Result<Option<UserAccount>, AuthApiError>;

    /// Replaces the account's current token with `token`, invalidating whatever session was current before.
    async fn set_current_token(&self, account_id: i64, token: &str) -> Result<(), AuthApiError>;
}
