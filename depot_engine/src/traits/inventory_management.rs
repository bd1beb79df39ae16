use thiserror::Error;

use crate::db_types::{NewOffer, Offer};

#[derive(Debug, Clone, Error)]
pub enum InventoryApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The store did not respond in time. Please retry.")]
    StoreTimeout,
    #[error("Invalid offer: {0}")]
    InvalidOffer(String),
}

impl From<sqlx::Error> for InventoryApiError {
    fn from(e: sqlx::Error) -> Self {
        if super::is_store_timeout(&e) {
            InventoryApiError::StoreTimeout
        } else {
            InventoryApiError::DatabaseError(e.to_string())
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait InventoryManagement {
    /// All offers, ordered by id.
    async fn fetch_offers(&self) -> Result<Vec<Offer>, InventoryApiError>;

    async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, InventoryApiError>;

    /// Inserts the offer, or overwrites the category, quantity and price of the existing offer with the same name.
    async fn upsert_offer(&self, offer: NewOffer) -> Result<Offer, InventoryApiError>;
}
