use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CartItem, CheckoutResult},
    traits::{CheckoutError, OrderManagement},
};

/// `CheckoutApi` places orders. See [`OrderManagement::checkout`] for the exact contract.
pub struct CheckoutApi<B> {
    db: B,
}

impl<B: Debug> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({:?})", self.db)
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Places an order for `cart`. Either every line is fulfilled and the order is stored as `pending`, or nothing
    /// changes and the first failing line is reported.
    pub async fn checkout(&self, cart: &[CartItem]) -> Result<CheckoutResult, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        trace!("🔄️ Checkout of {} lines started", cart.len());
        match self.db.checkout(cart).await {
            Ok(result) => {
                info!("🔄️ Order #{} placed. Total: {}", result.order_id, result.total);
                Ok(result)
            },
            Err(e) if e.is_rejection() => {
                debug!("🔄️ Checkout rejected: {e}");
                Err(e)
            },
            Err(e) => {
                warn!("🔄️ Checkout failed: {e}");
                Err(e)
            },
        }
    }
}
