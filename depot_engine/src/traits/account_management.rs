use thiserror::Error;

use crate::db_types::{NewUserAccount, Role, UserAccount};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The store did not respond in time. Please retry.")]
    StoreTimeout,
    #[error("An account with that username or email already exists")]
    AccountAlreadyExists,
    #[error("No account exists for {0}")]
    AccountNotFound(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid account details: {0}")]
    ValidationError(String),
    #[error("Could not hash password: {0}")]
    PasswordHashError(String),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        if super::is_store_timeout(&e) {
            AccountApiError::StoreTimeout
        } else if super::is_unique_violation(&e) {
            AccountApiError::AccountAlreadyExists
        } else {
            AccountApiError::DatabaseError(e.to_string())
        }
    }
}

/// The `AccountManagement` trait defines behaviour for creating and administering user accounts.
///
/// Accounts are keyed by email for all administrative operations. Usernames and emails are both unique.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Stores a new account. The password must already be hashed. Fails with
    /// [`AccountApiError::AccountAlreadyExists`] if the username or email is taken.
    async fn create_account(&self, account: NewUserAccount) -> Result<UserAccount, AccountApiError>;

    async fn fetch_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountApiError>;

    async fn fetch_accounts(&self) -> Result<Vec<UserAccount>, AccountApiError>;

    /// Removes the account with the given email. Returns `false` if no such account existed.
    async fn delete_account_by_email(&self, email: &str) -> Result<bool, AccountApiError>;

    /// Changes the role stored for the account. The new role takes effect at the account's next login.
    async fn set_role_for_email(&self, email: &str, role: Role) -> Result<Option<UserAccount>, AccountApiError>;
}
