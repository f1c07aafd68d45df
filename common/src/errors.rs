use crate::types::order_status::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Domain failures of the order lifecycle and assignment flow.
///
/// Every variant is a normal outcome for some caller: a losing claim sees
/// [`OrderFlowError::AlreadyAssigned`], an out-of-town customer sees
/// [`OrderFlowError::OutOfDeliveryRadius`]. None of them indicate a broken
/// engine, so they are all plain data the request layer can map to responses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderFlowError {
    #[error("order {0} not found")]
    OrderNotFound(u64),
    #[error("delivery worker {0} not found")]
    WorkerNotFound(String),
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("operation not allowed while order is {status}")]
    InvalidState { status: OrderStatus },
    #[error("order is already assigned to another delivery worker")]
    AlreadyAssigned,
    #[error("delivery worker is not available or not on duty")]
    WorkerUnavailable,
    #[error("delivery worker already has an active order")]
    WorkerBusy,
    #[error("delivery address is {distance_km:.2} km away, outside the delivery radius")]
    OutOfDeliveryRadius { distance_km: f64 },
    #[error("order has no items")]
    EmptyOrder,
    #[error("order subtotal is below the minimum of {minimum}")]
    BelowMinimum { minimum: Decimal },
}

/// Failures of one-time verification codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("no code issued for this subject")]
    NotFound,
    #[error("code has expired")]
    Expired,
    #[error("code does not match, {remaining} attempts remaining")]
    Mismatch { remaining: u8 },
    #[error("too many failed attempts")]
    MaxAttemptsExceeded,
}

/// Error surface of the facade actors.
///
/// Infrastructure failures (an actor mailbox that closed or timed out) are
/// kept apart from domain outcomes so the request layer never mistakes a
/// dead storage actor for a business rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Flow(#[from] OrderFlowError),
    #[error("storage unavailable: {0}")]
    Storage(String),
}
