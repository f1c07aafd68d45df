use common::constants::{DEFAULT_MAX_RADIUS_KM, DEFAULT_ORIGIN, ESTIMATED_DELIVERY_MINUTES};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Geospatial configuration an administrator can change at runtime.
///
/// The fee calculator re-reads this on every call, so relocating the
/// restaurant takes effect for the next computation without a restart.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Restaurant location (latitude, longitude) distances are measured from.
    pub origin: (f64, f64),
    /// Delivery radius in kilometers, boundary inclusive.
    pub max_radius_km: f64,
    /// Delivery fee per kilometer.
    pub rate_per_km: Decimal,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            max_radius_km: DEFAULT_MAX_RADIUS_KM,
            rate_per_km: Decimal::new(2000, 2), // 20.00 per km
        }
    }
}

pub type SharedGeoConfig = Arc<RwLock<GeoConfig>>;

pub fn shared_geo_config(config: GeoConfig) -> SharedGeoConfig {
    Arc::new(RwLock::new(config))
}

/// Order acceptance policy applied when a customer places an order.
#[derive(Debug, Clone)]
pub struct OrderPolicy {
    /// Smallest subtotal the restaurant accepts.
    pub min_order_amount: Decimal,
    /// Minutes quoted to the customer as the estimated delivery time.
    pub estimated_delivery_minutes: i64,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            min_order_amount: Decimal::new(10000, 2), // 100.00
            estimated_delivery_minutes: ESTIMATED_DELIVERY_MINUTES,
        }
    }
}
