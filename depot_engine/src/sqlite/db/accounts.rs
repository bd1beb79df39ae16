use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{NewUserAccount, Role, UserAccount};

pub async fn insert_account(account: NewUserAccount, conn: &mut SqliteConnection) -> Result<UserAccount, sqlx::Error> {
    let result: UserAccount = sqlx::query_as(
        r#"
        INSERT INTO user_accounts (username, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING *"#,
    )
    .bind(account.username)
    .bind(account.email)
    .bind(account.password_hash)
    .bind(account.role)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Account #{} ({}) created with role {}", result.id, result.username, result.role);
    Ok(result)
}

pub async fn account_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM user_accounts WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn account_by_token(token: &str, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM user_accounts WHERE current_token = $1").bind(token).fetch_optional(conn).await
}

pub async fn all_accounts(conn: &mut SqliteConnection) -> Result<Vec<UserAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM user_accounts ORDER BY id").fetch_all(conn).await
}

/// Returns the number of accounts removed (zero or one).
pub async fn delete_account_by_email(email: &str, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_accounts WHERE email = $1").bind(email).execute(conn).await?;
    trace!("🗃️ Delete account {email}: {} rows affected", result.rows_affected());
    Ok(result.rows_affected())
}

/// Records `token` as the account's only live session. Returns the number of accounts updated (zero or one).
pub async fn set_current_token(account_id: i64, token: &str, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE user_accounts SET current_token = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
    )
    .bind(token)
    .bind(account_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_role(email: &str, role: Role, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE user_accounts SET role = $1, updated_at = CURRENT_TIMESTAMP
        WHERE email = $2
        RETURNING *"#,
    )
    .bind(role)
    .bind(email)
    .fetch_optional(conn)
    .await
}
