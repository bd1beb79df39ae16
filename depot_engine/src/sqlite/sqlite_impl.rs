//! `SqliteDatabase` is the concrete backend of the depot engine.
//!
//! It implements all the traits defined in the [`crate::traits`] module. Each instance holds a handle to a shared
//! connection pool, so cloning it is cheap and every clone sees the same store.
use std::{fmt::Debug, time::Duration};

use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{accounts, new_pool, offers, orders};
use crate::{
    db_types::{
        CartItem,
        CheckoutResult,
        Credits,
        NewOffer,
        NewOrderLine,
        NewUserAccount,
        Offer,
        Order,
        OrderStatusType,
        Role,
        UserAccount,
    },
    traits::{
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
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating the file if it does not exist yet.
    pub async fn new_with_url(url: &str, max_connections: u32, store_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections, store_timeout).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await
    }

    /// Runs every step of a checkout in one transaction. Returning early drops the transaction, which rolls it back.
    async fn checkout_in_transaction(&self, cart: &[CartItem]) -> Result<CheckoutResult, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        let mut lines = Vec::with_capacity(cart.len());
        let mut total = Credits::default();
        for item in cart {
            if item.quantity <= 0 {
                return Err(CheckoutError::InvalidQuantity(item.offer_id));
            }
            let Some(unit_price) = offers::take_stock(item.offer_id, item.quantity, &mut tx).await? else {
                let refusal = if offers::offer_exists(item.offer_id, &mut tx).await? {
                    CheckoutError::InsufficientStock(item.offer_id)
                } else {
                    CheckoutError::UnknownItem(item.offer_id)
                };
                debug!("🗃️ Checkout refused: {refusal}");
                return Err(refusal);
            };
            let line_total = unit_price.checked_mul(item.quantity).ok_or(CheckoutError::TotalOverflow)?;
            total = total.checked_add(line_total).ok_or(CheckoutError::TotalOverflow)?;
            lines.push(NewOrderLine { offer_id: item.offer_id, quantity: item.quantity, unit_price });
        }
        let order = orders::insert_order(total, &lines, &mut tx).await?;
        tx.commit().await?;
        Ok(CheckoutResult { order_id: order.id, total: order.total, status: order.status })
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_account(&self, account: NewUserAccount) -> Result<UserAccount, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::insert_account(account, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::account_by_email(email, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_accounts(&self) -> Result<Vec<UserAccount>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let accounts = accounts::all_accounts(&mut conn).await?;
        Ok(accounts)
    }

    async fn delete_account_by_email(&self, email: &str) -> Result<bool, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = accounts::delete_account_by_email(email, &mut conn).await?;
        Ok(deleted > 0)
    }

    async fn set_role_for_email(&self, email: &str, role: Role) -> Result<Option<UserAccount>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::set_role(email, role, &mut conn).await?;
        Ok(account)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn fetch_account_by_token(&self, token: &str) -> Result<Option<UserAccount>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::account_by_token(token, &mut conn).await?;
        Ok(account)
    }

    async fn set_current_token(&self, account_id: i64, token: &str) -> Result<(), AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        match accounts::set_current_token(account_id, token, &mut conn).await? {
            0 => Err(AuthApiError::AccountNotFound(account_id)),
            _ => Ok(()),
        }
    }
}

impl InventoryManagement for SqliteDatabase {
    async fn fetch_offers(&self) -> Result<Vec<Offer>, InventoryApiError> {
        let mut conn = self.pool.acquire().await?;
        let offers = offers::fetch_offers(&mut conn).await?;
        Ok(offers)
    }

    async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, InventoryApiError> {
        let mut conn = self.pool.acquire().await?;
        let offer = offers::fetch_offer(offer_id, &mut conn).await?;
        Ok(offer)
    }

    async fn upsert_offer(&self, offer: NewOffer) -> Result<Offer, InventoryApiError> {
        let mut conn = self.pool.acquire().await?;
        let offer = offers::upsert_offer(offer, &mut conn).await?;
        Ok(offer)
    }
}

impl OrderManagement for SqliteDatabase {
    /// The conditional stock decrement is the first statement of the transaction, so the transaction goes straight
    /// for the write lock, and concurrent checkouts queue behind it for up to the configured busy timeout. A checkout
    /// that reaches the lock after the stock ran out sees the committed quantity and fails with `InsufficientStock`.
    async fn checkout(&self, cart: &[CartItem]) -> Result<CheckoutResult, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let result = self.checkout_in_transaction(cart).await?;
        debug!("🗃️ Order #{} placed for {}", result.order_id, result.total);
        Ok(result)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let orders = orders::fetch_orders(&mut tx).await?;
        tx.commit().await?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatusType,
    ) -> Result<Option<Order>, OrderApiError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order_status(order_id, status, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_status_tallies(&self) -> Result<Vec<StatusTally>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let tallies = orders::status_tallies(&mut conn).await?;
        Ok(tallies)
    }
}
