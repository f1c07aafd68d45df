use crate::config::OrderPolicy;
use crate::geo::GeoFeeCalculator;
use crate::messages::internal_messages::{
    AddOrder, Notify, OrderDelivered, OrderReady, PlaceOrder, TransitionOrder, UpdateOrderStatus,
};
use crate::server_actors::coordinator::AssignmentCoordinator;
use crate::server_actors::storage::Storage;
use actix::prelude::*;
use chrono::{Duration, Utc};
use colored::Color;
use common::constants::ADMIN_RECIPIENT;
use common::errors::{EngineError, OrderFlowError};
use common::logger::Logger;
use common::types::order::{OrderItem, OrderRecord};
use common::types::order_status::OrderStatus;
use common::utils::round_currency;
use rand::Rng;
use rust_decimal::Decimal;

/// The `OrderService` is the request-layer facade for customers and the
/// restaurant dashboard.
///
/// Placing an order validates the cart, prices the delivery, persists the
/// record and announces it. Status updates delegate the transition itself to
/// [`Storage`] and only orchestrate what each milestone triggers: job offers
/// when the kitchen finishes, release and farewell notifications on
/// delivery.
pub struct OrderService {
    storage: Addr<Storage>,
    coordinator: Addr<AssignmentCoordinator>,
    notifier: Recipient<Notify>,
    geo: GeoFeeCalculator,
    policy: OrderPolicy,
    next_order_id: u64,
    logger: Logger,
}

impl OrderService {
    pub fn new(
        storage: Addr<Storage>,
        coordinator: Addr<AssignmentCoordinator>,
        notifier: Recipient<Notify>,
        geo: GeoFeeCalculator,
        policy: OrderPolicy,
    ) -> Self {
        Self {
            storage,
            coordinator,
            notifier,
            geo,
            policy,
            next_order_id: 1,
            logger: Logger::new("OrderService", Color::Green),
        }
    }

    /// Human-facing order number: a timestamp plus four random digits, so
    /// two orders placed in the same second still differ.
    fn generate_order_number() -> String {
        let suffix: u16 = rand::thread_rng().gen_range(0..10000);
        format!("ORD{}{suffix:04}", Utc::now().format("%Y%m%d%H%M%S"))
    }

    fn validate(
        &self,
        items: &[OrderItem],
        delivery_position: (f64, f64),
    ) -> Result<Decimal, OrderFlowError> {
        if items.is_empty() {
            return Err(OrderFlowError::EmptyOrder);
        }
        let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
        if subtotal < self.policy.min_order_amount {
            return Err(OrderFlowError::BelowMinimum {
                minimum: self.policy.min_order_amount,
            });
        }
        if !self.geo.is_deliverable(delivery_position) {
            return Err(OrderFlowError::OutOfDeliveryRadius {
                distance_km: self.geo.distance_from_origin_km(delivery_position),
            });
        }
        Ok(round_currency(subtotal))
    }
}

impl Actor for OrderService {
    type Context = Context<Self>;
}

impl Handler<PlaceOrder> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderRecord, EngineError>>;

    fn handle(&mut self, msg: PlaceOrder, _ctx: &mut Self::Context) -> Self::Result {
        let validated = self.validate(&msg.items, msg.delivery_position);
        let subtotal = match validated {
            Ok(subtotal) => subtotal,
            Err(err) => {
                self.logger
                    .warn(format!("Order from {} rejected: {err}", msg.customer_id));
                return Box::pin(actix::fut::ready(Err(EngineError::from(err))));
            }
        };

        let delivery_fee = self.geo.delivery_fee(msg.delivery_position);
        let now = Utc::now();
        let order = OrderRecord {
            order_id: self.next_order_id,
            order_number: Self::generate_order_number(),
            customer_id: msg.customer_id,
            status: OrderStatus::Placed,
            items: msg.items,
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            worker_id: None,
            delivery_position: msg.delivery_position,
            delivery_address: msg.delivery_address,
            estimated_delivery_at: now
                + Duration::minutes(self.policy.estimated_delivery_minutes),
            created_at: now,
            accepted_at: None,
            ready_at: None,
            out_for_delivery_at: None,
            delivered_at: None,
        };
        self.next_order_id += 1;

        let storage = self.storage.clone();
        Box::pin(
            async move {
                storage
                    .send(AddOrder {
                        order: order.clone(),
                    })
                    .await
                    .map_err(|e| EngineError::Storage(e.to_string()))?;
                Ok(order)
            }
            .into_actor(self)
            .map(|result: Result<OrderRecord, EngineError>, actor, _ctx| {
                if let Ok(order) = &result {
                    actor.logger.info(format!(
                        "Order {} placed by {} for {}",
                        order.order_number, order.customer_id, order.total
                    ));
                    actor.notifier.do_send(Notify {
                        recipient: ADMIN_RECIPIENT.to_string(),
                        title: "New order placed".to_string(),
                        body: format!(
                            "Order {} from {} for {}",
                            order.order_number, order.customer_id, order.total
                        ),
                    });
                }
                result
            }),
        )
    }
}

impl Handler<UpdateOrderStatus> for OrderService {
    type Result = ResponseActFuture<Self, Result<OrderRecord, EngineError>>;

    fn handle(&mut self, msg: UpdateOrderStatus, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        Box::pin(
            async move {
                storage
                    .send(TransitionOrder {
                        order_id: msg.order_id,
                        target: msg.target,
                    })
                    .await
                    .map_err(|e| EngineError::Storage(e.to_string()))?
                    .map_err(EngineError::from)
            }
            .into_actor(self)
            .map(|result, actor, _ctx| {
                if let Ok(order) = &result {
                    actor.announce_milestone(order);
                }
                result
            }),
        )
    }
}

impl OrderService {
    /// Side effects each lifecycle milestone triggers once the transition
    /// has been recorded.
    fn announce_milestone(&self, order: &OrderRecord) {
        match order.status {
            OrderStatus::Accepted => {
                self.notifier.do_send(Notify {
                    recipient: order.customer_id.clone(),
                    title: "Order accepted".to_string(),
                    body: format!(
                        "Order {} was accepted, estimated delivery {}",
                        order.order_number,
                        order.estimated_delivery_at.format("%H:%M")
                    ),
                });
            }
            OrderStatus::Ready => {
                self.coordinator.do_send(OrderReady {
                    order_id: order.order_id,
                });
            }
            OrderStatus::OutForDelivery => {
                self.notifier.do_send(Notify {
                    recipient: order.customer_id.clone(),
                    title: "Order out for delivery".to_string(),
                    body: format!("Order {} is on its way", order.order_number),
                });
            }
            OrderStatus::Delivered => {
                self.coordinator.do_send(OrderDelivered {
                    order_id: order.order_id,
                });
            }
            OrderStatus::Cancelled => {
                self.notifier.do_send(Notify {
                    recipient: order.customer_id.clone(),
                    title: "Order cancelled".to_string(),
                    body: format!("Order {} was cancelled", order.order_number),
                });
            }
            _ => {}
        }
    }
}
