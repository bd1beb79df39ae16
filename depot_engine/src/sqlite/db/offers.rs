use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{Credits, NewOffer, Offer};

pub async fn fetch_offers(conn: &mut SqliteConnection) -> Result<Vec<Offer>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM offers ORDER BY id").fetch_all(conn).await
}

pub async fn fetch_offer(offer_id: i64, conn: &mut SqliteConnection) -> Result<Option<Offer>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM offers WHERE id = $1").bind(offer_id).fetch_optional(conn).await
}

pub async fn offer_exists(offer_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE id = $1").bind(offer_id).fetch_one(conn).await?;
    Ok(count > 0)
}

pub async fn upsert_offer(offer: NewOffer, conn: &mut SqliteConnection) -> Result<Offer, sqlx::Error> {
    let result: Offer = sqlx::query_as(
        r#"
        INSERT INTO offers (name, category, quantity, price)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (name) DO UPDATE SET
            category = excluded.category,
            quantity = excluded.quantity,
            price = excluded.price,
            updated_at = CURRENT_TIMESTAMP
        RETURNING *"#,
    )
    .bind(offer.name)
    .bind(offer.category)
    .bind(offer.quantity)
    .bind(offer.price)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Offer #{} ({}) stocked with {} units at {}", result.id, result.name, result.quantity, result.price);
    Ok(result)
}

/// Takes `quantity` units of the offer in a single conditional statement and returns the offer's unit price.
///
/// The decrement only happens if the offer exists and has at least `quantity` units, so stock can never go negative,
/// even when concurrent transactions race for the same offer. `None` means nothing was taken; use [`offer_exists`]
/// to find out why.
pub async fn take_stock(
    offer_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Credits>, sqlx::Error> {
    let price: Option<Credits> = sqlx::query_scalar(
        r#"
        UPDATE offers SET quantity = quantity - $1, updated_at = CURRENT_TIMESTAMP
        WHERE id = $2 AND quantity >= $1
        RETURNING price"#,
    )
    .bind(quantity)
    .bind(offer_id)
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ Take {quantity} of offer #{offer_id}: {}", if price.is_some() { "ok" } else { "refused" });
    Ok(price)
}
