use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderStatusType},
    depot_api::order_objects::DashboardMetrics,
    traits::{OrderApiError, OrderManagement},
};

/// `OrderLifecycleApi` reads and moves orders through their statuses after checkout, and summarises them for admins.
pub struct OrderLifecycleApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderLifecycleApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderLifecycleApi ({:?})", self.db)
    }
}

impl<B> OrderLifecycleApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn order_status(&self, order_id: i64) -> Result<OrderStatusType, OrderApiError> {
        self.order(order_id).await.map(|o| o.status)
    }

    pub async fn order(&self, order_id: i64) -> Result<Order, OrderApiError> {
        self.db.fetch_order(order_id).await?.ok_or(OrderApiError::OrderNotFound(order_id))
    }

    /// All orders with their lines, ascending by id.
    pub async fn orders(&self) -> Result<Vec<Order>, OrderApiError> {
        self.db.fetch_orders().await
    }

    /// Sets the status of an order. Any assignable status may replace any other; `pending` and unknown statuses are
    /// refused without touching the store.
    pub async fn update_status(&self, order_id: i64, status: &str) -> Result<OrderStatusType, OrderApiError> {
        let new_status = status
            .parse::<OrderStatusType>()
            .ok()
            .filter(OrderStatusType::is_assignable)
            .ok_or_else(|| OrderApiError::InvalidStatus(status.to_string()))?;
        let order =
            self.db.update_order_status(order_id, new_status).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
        info!("🔄️ Order #{order_id} status changed to {}", order.status);
        Ok(order.status)
    }

    pub async fn dashboard(&self) -> Result<DashboardMetrics, OrderApiError> {
        let tallies = self.db.fetch_status_tallies().await?;
        Ok(DashboardMetrics::from_tallies(&tallies))
    }
}
