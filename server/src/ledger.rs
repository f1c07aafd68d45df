//! Order lifecycle rules: which status may follow which, and which
//! timestamp each step stamps.
//!
//! The rules are pure functions over an [`OrderRecord`]; serialization of
//! concurrent transitions is the storage actor's job.

use chrono::{DateTime, Utc};
use common::errors::OrderFlowError;
use common::types::order::OrderRecord;
use common::types::order_status::OrderStatus;

/// Moves `order` to `target` if the transition graph allows it.
///
/// On success the matching lifecycle timestamp is stamped, but only if it is
/// still unset: a re-entry into a status a caller bug might produce must not
/// overwrite the original time.
pub fn apply_transition(
    order: &mut OrderRecord,
    target: OrderStatus,
    now: DateTime<Utc>,
) -> Result<(), OrderFlowError> {
    let from = order.status;
    if !from.can_transition_to(target) {
        return Err(OrderFlowError::InvalidTransition { from, to: target });
    }

    order.status = target;

    let stamp = match target {
        OrderStatus::Accepted => &mut order.accepted_at,
        OrderStatus::Ready => &mut order.ready_at,
        OrderStatus::OutForDelivery => &mut order.out_for_delivery_at,
        OrderStatus::Delivered => &mut order.delivered_at,
        _ => return Ok(()),
    };
    if stamp.is_none() {
        *stamp = Some(now);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn test_order(status: OrderStatus) -> OrderRecord {
        OrderRecord {
            order_id: 1,
            order_number: "ORD202501010000000001".to_string(),
            customer_id: "client1".to_string(),
            status,
            items: Vec::new(),
            subtotal: Decimal::new(25000, 2),
            delivery_fee: Decimal::new(2440, 2),
            total: Decimal::new(27440, 2),
            worker_id: None,
            delivery_position: (28.6090, 77.2090),
            delivery_address: "42 Main Street".to_string(),
            estimated_delivery_at: Utc::now(),
            created_at: Utc::now(),
            accepted_at: None,
            ready_at: None,
            out_for_delivery_at: None,
            delivered_at: None,
        }
    }

    #[test]
    fn transition_graph_closure() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let mut order = test_order(from);
                let result = apply_transition(&mut order, to, Utc::now());
                if from.can_transition_to(to) {
                    assert!(result.is_ok(), "{from} -> {to} should be legal");
                    assert_eq!(order.status, to);
                } else {
                    assert_eq!(
                        result,
                        Err(OrderFlowError::InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                    assert_eq!(order.status, from, "rejected transition must not move");
                }
            }
        }
    }

    #[test]
    fn terminal_orders_are_immutable() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            for to in OrderStatus::ALL {
                let mut order = test_order(terminal);
                assert!(apply_transition(&mut order, to, Utc::now()).is_err());
            }
        }
    }

    #[test]
    fn walking_the_happy_path_stamps_each_timestamp() {
        let mut order = test_order(OrderStatus::PendingPayment);
        let now = Utc::now();
        for target in [
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            apply_transition(&mut order, target, now).unwrap();
        }
        assert_eq!(order.accepted_at, Some(now));
        assert_eq!(order.ready_at, Some(now));
        assert_eq!(order.out_for_delivery_at, Some(now));
        assert_eq!(order.delivered_at, Some(now));
    }

    #[test]
    fn repeating_a_target_fails_because_the_status_moved() {
        let mut order = test_order(OrderStatus::Placed);
        apply_transition(&mut order, OrderStatus::Accepted, Utc::now()).unwrap();
        assert!(apply_transition(&mut order, OrderStatus::Accepted, Utc::now()).is_err());
    }

    #[test]
    fn a_stamped_timestamp_is_never_overwritten() {
        let mut order = test_order(OrderStatus::Placed);
        let first = Utc::now();
        apply_transition(&mut order, OrderStatus::Accepted, first).unwrap();

        // Simulate a caller bug re-entering the same status later.
        order.status = OrderStatus::Placed;
        let later = first + Duration::seconds(30);
        apply_transition(&mut order, OrderStatus::Accepted, later).unwrap();
        assert_eq!(order.accepted_at, Some(first));
    }
}
