use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::UserAccount,
    traits::{AuthApiError, AuthManagement},
};

/// `AuthApi` keeps track of which session token is current for each account.
pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The account for which `token` is the current session token. `None` means the token was never issued, or has
    /// since been replaced by a newer login.
    pub async fn account_for_token(&self, token: &str) -> Result<Option<UserAccount>, AuthApiError> {
        self.db.fetch_account_by_token(token).await
    }

    /// Makes `token` the only session token honoured for the account.
    pub async fn record_session_token(&self, account_id: i64, token: &str) -> Result<(), AuthApiError> {
        self.db.set_current_token(account_id, token).await?;
        trace!("🔑️ New session recorded for account #{account_id}");
        Ok(())
    }
}
