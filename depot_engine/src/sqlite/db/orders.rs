use std::collections::HashMap;

use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Credits, NewOrderLine, Order, OrderLine, OrderStatusType},
    traits::StatusTally,
};

/// Inserts a `pending` order and its lines. Call this inside the same transaction that took the stock.
pub async fn insert_order(
    total: Credits,
    lines: &[NewOrderLine],
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let mut order: Order = sqlx::query_as("INSERT INTO orders (status, total) VALUES ($1, $2) RETURNING *")
        .bind(OrderStatusType::Pending)
        .bind(total)
        .fetch_one(&mut *conn)
        .await?;
    for line in lines {
        let line: OrderLine = sqlx::query_as(
            r#"
            INSERT INTO order_lines (order_id, offer_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(order.id)
        .bind(line.offer_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .fetch_one(&mut *conn)
        .await?;
        order.lines.push(line);
    }
    debug!("🗃️ Order #{} for {} saved with {} lines", order.id, order.total, order.lines.len());
    Ok(order)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(&mut *conn).await?;
    match order {
        Some(mut order) => {
            order.lines = fetch_lines(order.id, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}

pub async fn fetch_lines(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_lines WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await
}

pub async fn fetch_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders ORDER BY id").fetch_all(&mut *conn).await?;
    let lines: Vec<OrderLine> = sqlx::query_as("SELECT * FROM order_lines ORDER BY id").fetch_all(conn).await?;
    let mut lines_by_order = lines.into_iter().fold(HashMap::<i64, Vec<OrderLine>>::new(), |mut acc, line| {
        acc.entry(line.order_id).or_default().push(line);
        acc
    });
    for order in orders.iter_mut() {
        order.lines = lines_by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
}

pub async fn update_order_status(
    order_id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
        UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP
        WHERE id = $2
        RETURNING *"#,
    )
    .bind(status)
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;
    match order {
        Some(mut order) => {
            debug!("🗃️ Order #{order_id} is now {status}");
            order.lines = fetch_lines(order_id, conn).await?;
            Ok(Some(order))
        },
        None => Ok(None),
    }
}

pub async fn status_tallies(conn: &mut SqliteConnection) -> Result<Vec<StatusTally>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT status, COUNT(*) AS count, COALESCE(SUM(total), 0) AS revenue
        FROM orders
        GROUP BY status"#,
    )
    .fetch_all(conn)
    .await
}
