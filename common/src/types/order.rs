use crate::types::order_status::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A customer order as the storage actor keeps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Numeric identity of the order.
    pub order_id: u64,
    /// Human-facing order number, e.g. `ORD202501311230450042`.
    pub order_number: String,
    /// Customer that placed the order.
    pub customer_id: String,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Priced line items.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Distance-based delivery fee.
    pub delivery_fee: Decimal,
    /// `subtotal + delivery_fee`.
    pub total: Decimal,
    /// Assigned delivery worker, set only by the assignment coordinator.
    pub worker_id: Option<String>,
    /// Destination coordinates (latitude, longitude).
    pub delivery_position: (f64, f64),
    /// Destination street address.
    pub delivery_address: String,
    /// Promised delivery time, set at placement.
    pub estimated_delivery_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Lifecycle timestamps, each written at most once.
    pub accepted_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub out_for_delivery_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Eq for OrderRecord {}

impl PartialEq for OrderRecord {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl std::hash::Hash for OrderRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}
