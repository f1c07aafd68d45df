use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order.
///
/// The legal-transition graph is the data returned by [`OrderStatus::successors`];
/// nothing else in the engine hardcodes which step follows which.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Placed,
    Accepted,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::PendingPayment,
        OrderStatus::Placed,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses reachable from `self` in one legal transition.
    ///
    /// The happy path is a straight chain; `Cancelled` is reachable from every
    /// non-terminal state; terminal states have no successors.
    pub fn successors(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::PendingPayment => &[OrderStatus::Placed, OrderStatus::Cancelled],
            OrderStatus::Placed => &[OrderStatus::Accepted, OrderStatus::Cancelled],
            OrderStatus::Accepted => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
            OrderStatus::Ready => &[OrderStatus::OutForDelivery, OrderStatus::Cancelled],
            OrderStatus::OutForDelivery => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.successors().contains(&target)
    }

    /// Whether a delivery worker may claim an order in this status.
    pub fn is_assignable(self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Preparing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::PendingPayment => write!(f, "Pending Payment"),
            OrderStatus::Placed => write!(f, "Placed"),
            OrderStatus::Accepted => write!(f, "Accepted"),
            OrderStatus::Preparing => write!(f, "Preparing"),
            OrderStatus::Ready => write!(f, "Ready"),
            OrderStatus::OutForDelivery => write!(f, "Out for Delivery"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_successors() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Delivered.successors().is_empty());
        assert!(OrderStatus::Cancelled.successors().is_empty());
    }

    #[test]
    fn every_non_terminal_state_can_cancel() {
        for status in OrderStatus::ALL {
            if !status.is_terminal() {
                assert!(
                    status.can_transition_to(OrderStatus::Cancelled),
                    "{status} should be cancellable"
                );
            }
        }
    }

    #[test]
    fn happy_path_is_a_chain() {
        let chain = [
            OrderStatus::PendingPayment,
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ];
        for pair in chain.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
        // No skipping ahead.
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn only_ready_and_preparing_are_assignable() {
        for status in OrderStatus::ALL {
            let expected =
                matches!(status, OrderStatus::Ready | OrderStatus::Preparing);
            assert_eq!(status.is_assignable(), expected, "{status}");
        }
    }
}
