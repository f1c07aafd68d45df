use std::time::Duration;

/// Earth radius used by the haversine distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default delivery radius around the restaurant, in kilometers.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 10.0;

/// Default restaurant location, used until an administrator relocates it.
pub const DEFAULT_ORIGIN: (f64, f64) = (28.6139, 77.2090);

/// Length of generated one-time verification codes.
pub const CODE_LENGTH: usize = 6;

/// Failed verification attempts allowed before a code is invalidated.
pub const CODE_MAX_ATTEMPTS: u8 = 3;

/// Default lifetime of an issued verification code.
pub const CODE_TTL: Duration = Duration::from_secs(5 * 60);

/// How often the in-memory code store sweeps out expired entries.
pub const CODE_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Minutes added to the placement time to estimate delivery.
pub const ESTIMATED_DELIVERY_MINUTES: i64 = 45;

/// Recipient identifier for notifications addressed to the admin dashboard.
pub const ADMIN_RECIPIENT: &str = "admin";
