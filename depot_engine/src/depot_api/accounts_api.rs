//! Unifies API for registering and administering user accounts.

use std::fmt::Debug;

use log::{debug, info};

use crate::{
    db_types::{NewUserAccount, Role, UserAccount},
    helpers::{hash_password, verify_password},
    traits::{AccountApiError, AccountManagement},
};

/// The `AccountApi` provides a unified API for user accounts.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a new account with the `user` role.
    ///
    /// All fields must be non-empty and the email must contain an `@`. The password is stored as an Argon2 hash.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount, AccountApiError> {
        validate_registration(username, email, password)?;
        let account = self.new_account(username, email, password, Role::User).await?;
        let account = self.db.create_account(account).await?;
        info!("🧑️ Registered new account #{} ({})", account.id, account.username);
        Ok(account)
    }

    /// Returns the account for `email` if `password` matches its stored hash. An unknown email and a wrong password
    /// are indistinguishable to the caller.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<UserAccount, AccountApiError> {
        let account = self.db.fetch_account_by_email(email).await?.ok_or(AccountApiError::InvalidCredentials)?;
        let hash = account.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AccountApiError::PasswordHashError(e.to_string()))?;
        if verified {
            Ok(account)
        } else {
            debug!("🧑️ Password mismatch for {email}");
            Err(AccountApiError::InvalidCredentials)
        }
    }

    pub async fn account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountApiError> {
        self.db.fetch_account_by_email(email).await
    }

    pub async fn accounts(&self) -> Result<Vec<UserAccount>, AccountApiError> {
        self.db.fetch_accounts().await
    }

    pub async fn delete_account(&self, email: &str) -> Result<(), AccountApiError> {
        if self.db.delete_account_by_email(email).await? {
            info!("🧑️ Account {email} deleted");
            Ok(())
        } else {
            Err(AccountApiError::AccountNotFound(email.to_string()))
        }
    }

    /// Changes the stored role for an account. Sessions that are already running keep the role they were issued with
    /// until the account logs in again.
    pub async fn set_role(&self, email: &str, role: Role) -> Result<UserAccount, AccountApiError> {
        let account = self
            .db
            .set_role_for_email(email, role)
            .await?
            .ok_or_else(|| AccountApiError::AccountNotFound(email.to_string()))?;
        info!("🧑️ Account {email} now has the {role} role");
        Ok(account)
    }

    /// Makes sure an admin account exists for `email`. A missing account is created with the given credentials; an
    /// existing one keeps its password and is promoted.
    pub async fn ensure_admin(&self, username: &str, email: &str, password: &str) -> Result<UserAccount, AccountApiError> {
        match self.db.fetch_account_by_email(email).await? {
            Some(account) if account.role == Role::Admin => Ok(account),
            Some(_) => self.set_role(email, Role::Admin).await,
            None => {
                validate_registration(username, email, password)?;
                let account = self.new_account(username, email, password, Role::Admin).await?;
                let account = self.db.create_account(account).await?;
                info!("🧑️ Created admin account #{} ({})", account.id, account.username);
                Ok(account)
            },
        }
    }

    async fn new_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<NewUserAccount, AccountApiError> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AccountApiError::PasswordHashError(e.to_string()))?
            .map_err(|e| AccountApiError::PasswordHashError(e.to_string()))?;
        Ok(NewUserAccount { username: username.to_string(), email: email.to_string(), password_hash, role })
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AccountApiError> {
    if username.trim().is_empty() {
        return Err(AccountApiError::ValidationError("username is required".into()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AccountApiError::ValidationError("a valid email address is required".into()));
    }
    if password.is_empty() {
        return Err(AccountApiError::ValidationError("password is required".into()));
    }
    Ok(())
}
