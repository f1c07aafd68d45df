use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A delivery worker as the availability registry keeps them.
///
/// `is_available == false` while on duty means the worker holds an active
/// assignment; the storage actor flips it in the same handler that binds or
/// releases the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Unique identity of the worker.
    pub worker_id: String,
    /// Can accept a new job right now.
    pub is_available: bool,
    /// Logged in for work.
    pub is_on_duty: bool,
    /// Last reported coordinates, if any.
    pub position: Option<(f64, f64)>,
    /// When the worker record was last touched.
    pub last_seen: DateTime<Utc>,
}

impl WorkerRecord {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            is_available: false,
            is_on_duty: false,
            position: None,
            last_seen: Utc::now(),
        }
    }

    /// On duty and free to take a new order.
    pub fn can_take_order(&self) -> bool {
        self.is_on_duty && self.is_available
    }
}
