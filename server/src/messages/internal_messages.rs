use actix::prelude::*;
use common::errors::{CodeError, EngineError, OrderFlowError};
use common::types::order::{OrderItem, OrderRecord};
use common::types::order_status::OrderStatus;
use common::types::worker::WorkerRecord;
use std::time::Duration;

/////////////////////////////////////////////////////////////////////
// Storage: order ledger
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct AddOrder {
    pub order: OrderRecord,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Option<OrderRecord>")]
pub struct GetOrder {
    pub order_id: u64,
}

/// Applies one lifecycle transition to a stored order and returns the
/// updated record.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderRecord, OrderFlowError>")]
pub struct TransitionOrder {
    pub order_id: u64,
    pub target: OrderStatus,
}

/////////////////////////////////////////////////////////////////////
// Storage: worker registry
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct RegisterWorker {
    pub worker_id: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Option<WorkerRecord>")]
pub struct GetWorker {
    pub worker_id: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<WorkerRecord, OrderFlowError>")]
pub struct SetWorkerDuty {
    pub worker_id: String,
    pub on_duty: bool,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<WorkerRecord, OrderFlowError>")]
pub struct SetWorkerPosition {
    pub worker_id: String,
    pub position: (f64, f64),
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Vec<String>")]
pub struct ListAvailableWorkers;

/////////////////////////////////////////////////////////////////////
// Storage: assignment bookkeeping
/////////////////////////////////////////////////////////////////////

/// Binds a worker to an order exclusively. The storage mailbox serializes
/// concurrent attempts, so at most one of them succeeds.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderRecord, OrderFlowError>")]
pub struct AssignOrder {
    pub order_id: u64,
    pub worker_id: String,
}

/// Drops the active assignment of a finished order and, when the worker
/// carries nothing else, marks them available again. Refused while the
/// order is still in flight. Safe to send twice.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<(), OrderFlowError>")]
pub struct ReleaseWorker {
    pub order_id: u64,
}

/////////////////////////////////////////////////////////////////////
// Assignment coordinator
/////////////////////////////////////////////////////////////////////

/// A worker asks to take an order they were offered.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderRecord, EngineError>")]
pub struct ClaimOrder {
    pub order_id: u64,
    pub worker_id: String,
}

/// An order just became ready; offer it to every available worker.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct OrderReady {
    pub order_id: u64,
}

/// An order reached its customer; release the worker and notify.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct OrderDelivered {
    pub order_id: u64,
}

/////////////////////////////////////////////////////////////////////
// Order service
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderRecord, EngineError>")]
pub struct PlaceOrder {
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub delivery_position: (f64, f64),
    pub delivery_address: String,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<OrderRecord, EngineError>")]
pub struct UpdateOrderStatus {
    pub order_id: u64,
    pub target: OrderStatus,
}

/////////////////////////////////////////////////////////////////////
// Code store
/////////////////////////////////////////////////////////////////////

/// Mints a short-lived numeric code for `subject` and returns it.
/// Reissuing replaces any previous code for the same subject.
#[derive(Message, Debug, Clone)]
#[rtype(result = "String")]
pub struct IssueCode {
    pub subject: String,
    pub ttl: Duration,
}

/// Checks a submitted code. A match consumes the code; a mismatch burns
/// one of the limited attempts.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Result<(), CodeError>")]
pub struct VerifyCode {
    pub subject: String,
    pub code: String,
}

/////////////////////////////////////////////////////////////////////
// Notifier
/////////////////////////////////////////////////////////////////////

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Notify {
    pub recipient: String,
    pub title: String,
    pub body: String,
}
