use std::fmt::Debug;

use crate::{
    db_types::{NewOffer, Offer},
    traits::{InventoryApiError, InventoryManagement},
};

/// `InventoryApi` lists the stocked offers and seeds new stock. Stock is only ever taken away through checkout.
pub struct InventoryApi<B> {
    db: B,
}

impl<B: Debug> Debug for InventoryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InventoryApi ({:?})", self.db)
    }
}

impl<B> InventoryApi<B>
where B: InventoryManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// All offers, ascending by id.
    pub async fn offers(&self) -> Result<Vec<Offer>, InventoryApiError> {
        self.db.fetch_offers().await
    }

    pub async fn offer(&self, offer_id: i64) -> Result<Option<Offer>, InventoryApiError> {
        self.db.fetch_offer(offer_id).await
    }

    /// Stocks an offer, overwriting the offer with the same name if there is one.
    pub async fn upsert_offer(&self, offer: NewOffer) -> Result<Offer, InventoryApiError> {
        if offer.name.trim().is_empty() {
            return Err(InventoryApiError::InvalidOffer("name is required".into()));
        }
        if offer.quantity < 0 {
            return Err(InventoryApiError::InvalidOffer(format!("{} has a negative quantity", offer.name)));
        }
        if offer.price.is_negative() {
            return Err(InventoryApiError::InvalidOffer(format!("{} has a negative price", offer.name)));
        }
        self.db.upsert_offer(offer).await
    }
}
