//! One-off tasks that run before the server starts accepting requests.
use std::path::Path;

use depot_engine::{db_types::NewOffer, AccountApi, AccountManagement, InventoryApi, InventoryManagement};
use log::*;

use crate::{config::AdminBootstrap, errors::ServerError};

/// Reads a JSON array of `{name, category, quantity, price}` records and upserts each one by name.
/// Returns the number of offers written.
pub async fn seed_offers<B: InventoryManagement>(path: &Path, api: &InventoryApi<B>) -> Result<usize, ServerError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let offers: Vec<NewOffer> = serde_json::from_str(&contents).map_err(|e| {
        ServerError::InitializeError(format!("{} does not contain a list of offers. {e}", path.display()))
    })?;
    let count = offers.len();
    for offer in offers {
        let name = offer.name.clone();
        let offer = api.upsert_offer(offer).await.map_err(|e| {
            ServerError::InitializeError(format!("Could not seed offer '{name}'. {e}"))
        })?;
        debug!("🚀️ Seeded offer #{} {} ({} in stock @ {})", offer.id, offer.name, offer.quantity, offer.price);
    }
    info!("🚀️ Seeded {count} offers from {}", path.display());
    Ok(count)
}

/// Makes sure the configured admin account exists and carries the admin role.
pub async fn bootstrap_admin<B: AccountManagement>(
    admin: &AdminBootstrap,
    api: &AccountApi<B>,
) -> Result<(), ServerError> {
    let account = api
        .ensure_admin(&admin.username, &admin.email, admin.password.reveal())
        .await
        .map_err(|e| ServerError::InitializeError(format!("Could not bootstrap the admin account. {e}")))?;
    info!("🚀️ {} ({}) is an admin", account.username, account.email);
    Ok(())
}
