use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Credits, OrderStatusType},
    traits::StatusTally,
};

/// Summary figures for the admin dashboard. Revenue covers every order, whatever its status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_orders: i64,
    pub total_revenue: Credits,
    pub pending_orders: i64,
    pub preparing_orders: i64,
    pub processing_orders: i64,
    pub shipped_orders: i64,
    pub delivered_orders: i64,
}

impl DashboardMetrics {
    pub fn from_tallies(tallies: &[StatusTally]) -> Self {
        tallies.iter().fold(Self::default(), |mut metrics, tally| {
            metrics.total_orders += tally.count;
            metrics.total_revenue += tally.revenue;
            let bucket = match tally.status {
                OrderStatusType::Pending => &mut metrics.pending_orders,
                OrderStatusType::Preparing => &mut metrics.preparing_orders,
                OrderStatusType::Processing => &mut metrics.processing_orders,
                OrderStatusType::Shipped => &mut metrics.shipped_orders,
                OrderStatusType::Delivered => &mut metrics.delivered_orders,
            };
            *bucket += tally.count;
            metrics
        })
    }
}
