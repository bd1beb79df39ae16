use depot_engine::{
    db_types::{Credits, NewOffer, Offer, OfferCategory},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    InventoryApi,
    SqliteDatabase,
};

/// A fresh database holding one offer per `(name, quantity, price)` triple, in order.
pub async fn stocked_db(stock: &[(&str, i64, i64)]) -> (SqliteDatabase, Vec<Offer>) {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let inventory = InventoryApi::new(db.clone());
    let mut offers = Vec::with_capacity(stock.len());
    for (name, quantity, price) in stock {
        let offer = NewOffer::new(*name, OfferCategory::Food, *quantity, Credits::from(*price));
        offers.push(inventory.upsert_offer(offer).await.expect("Error seeding offer"));
    }
    (db, offers)
}

#[allow(dead_code)]
pub async fn quantity_of(db: &SqliteDatabase, offer_id: i64) -> i64 {
    InventoryApi::new(db.clone()).offer(offer_id).await.expect("Error fetching offer").expect("Offer missing").quantity
}
