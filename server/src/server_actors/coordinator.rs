use crate::messages::internal_messages::{
    AssignOrder, ClaimOrder, GetOrder, ListAvailableWorkers, Notify, OrderDelivered, OrderReady,
    ReleaseWorker,
};
use crate::server_actors::storage::Storage;
use actix::prelude::*;
use colored::Color;
use common::constants::ADMIN_RECIPIENT;
use common::errors::EngineError;
use common::logger::Logger;
use common::types::order::OrderRecord;

/// The `AssignmentCoordinator` drives the hand-off of ready orders to
/// delivery workers.
///
/// It owns no state of its own: every claim is forwarded to [`Storage`],
/// whose mailbox decides races. The coordinator's job is orchestration,
/// broadcasting offers when an order becomes ready, answering workers who
/// claim one, and unwinding the assignment once the order is delivered.
pub struct AssignmentCoordinator {
    storage: Addr<Storage>,
    notifier: Recipient<Notify>,
    logger: Logger,
}

impl AssignmentCoordinator {
    pub fn new(storage: Addr<Storage>, notifier: Recipient<Notify>) -> Self {
        Self {
            storage,
            notifier,
            logger: Logger::new("Coordinator", Color::Magenta),
        }
    }
}

impl Actor for AssignmentCoordinator {
    type Context = Context<Self>;
}

/// A worker claims an order. The first claim to reach storage wins; everyone
/// else gets the error storage decided on.
impl Handler<ClaimOrder> for AssignmentCoordinator {
    type Result = ResponseActFuture<Self, Result<OrderRecord, EngineError>>;

    fn handle(&mut self, msg: ClaimOrder, _ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        Box::pin(
            async move {
                storage
                    .send(AssignOrder {
                        order_id: msg.order_id,
                        worker_id: msg.worker_id.clone(),
                    })
                    .await
                    .map_err(|e| EngineError::Storage(e.to_string()))?
                    .map_err(EngineError::from)
            }
            .into_actor(self)
            .map(|result, actor, _ctx| {
                if let Ok(order) = &result {
                    actor.notifier.do_send(Notify {
                        recipient: order.customer_id.clone(),
                        title: "Order out for delivery".to_string(),
                        body: format!(
                            "Order {} was picked up by {}",
                            order.order_number,
                            order.worker_id.as_deref().unwrap_or("a worker")
                        ),
                    });
                }
                result
            }),
        )
    }
}

/// Offers a ready order to every available worker. Skipped silently when the
/// order moved on or got assigned in the meantime.
impl Handler<OrderReady> for AssignmentCoordinator {
    type Result = ();

    fn handle(&mut self, msg: OrderReady, ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        let logger = self.logger.clone();
        ctx.spawn(
            async move {
                let order = match storage.send(GetOrder { order_id: msg.order_id }).await {
                    Ok(Some(order)) => order,
                    Ok(None) => {
                        logger.warn(format!("Ready signal for unknown order {}", msg.order_id));
                        return None;
                    }
                    Err(e) => {
                        logger.error(format!("Storage unreachable: {e}"));
                        return None;
                    }
                };
                if !order.status.is_assignable() || order.worker_id.is_some() {
                    return None;
                }
                match storage.send(ListAvailableWorkers).await {
                    Ok(workers) => Some((order, workers)),
                    Err(e) => {
                        logger.error(format!("Storage unreachable: {e}"));
                        None
                    }
                }
            }
            .into_actor(self)
            .map(|offer, actor, _ctx| {
                let Some((order, workers)) = offer else {
                    return;
                };
                if workers.is_empty() {
                    actor.logger.warn(format!(
                        "No workers available for order {}",
                        order.order_number
                    ));
                    return;
                }
                actor.logger.info(format!(
                    "Offering order {} to {} worker(s)",
                    order.order_number,
                    workers.len()
                ));
                for worker_id in workers {
                    actor.notifier.do_send(Notify {
                        recipient: worker_id,
                        title: "New order available".to_string(),
                        body: format!(
                            "Order {} ({}) to {}",
                            order.order_number, order.total, order.delivery_address
                        ),
                    });
                }
            }),
        );
    }
}

/// Unwinds a finished delivery: frees the worker and tells the customer and
/// the admin.
impl Handler<OrderDelivered> for AssignmentCoordinator {
    type Result = ();

    fn handle(&mut self, msg: OrderDelivered, ctx: &mut Self::Context) -> Self::Result {
        let storage = self.storage.clone();
        let logger = self.logger.clone();
        ctx.spawn(
            async move {
                if let Err(e) = storage
                    .send(ReleaseWorker { order_id: msg.order_id })
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|r| r.map_err(|e| e.to_string()))
                {
                    logger.error(format!(
                        "Could not release worker for order {}: {e}",
                        msg.order_id
                    ));
                }
                match storage.send(GetOrder { order_id: msg.order_id }).await {
                    Ok(order) => order,
                    Err(_) => None,
                }
            }
            .into_actor(self)
            .map(|order, actor, _ctx| {
                let Some(order) = order else {
                    return;
                };
                actor.notifier.do_send(Notify {
                    recipient: order.customer_id.clone(),
                    title: "Order delivered".to_string(),
                    body: format!("Order {} has been delivered. Enjoy!", order.order_number),
                });
                actor.notifier.do_send(Notify {
                    recipient: ADMIN_RECIPIENT.to_string(),
                    title: "Order delivered".to_string(),
                    body: format!(
                        "Order {} delivered by {}",
                        order.order_number,
                        order.worker_id.as_deref().unwrap_or("unknown")
                    ),
                });
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::internal_messages::{
        AddOrder, GetWorker, RegisterWorker, SetWorkerDuty, TransitionOrder,
    };
    use chrono::Utc;
    use common::errors::OrderFlowError;
    use common::types::order::OrderItem;
    use common::types::order_status::OrderStatus;
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use std::time::Duration;

    /// Records every notification it receives, for assertions.
    struct Probe {
        seen: Arc<Mutex<Vec<Notify>>>,
    }

    impl Actor for Probe {
        type Context = Context<Self>;
    }

    impl Handler<Notify> for Probe {
        type Result = ();

        fn handle(&mut self, msg: Notify, _ctx: &mut Self::Context) -> Self::Result {
            self.seen.lock().push(msg);
        }
    }

    fn probe() -> (Recipient<Notify>, Arc<Mutex<Vec<Notify>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let addr = Probe { seen: seen.clone() }.start();
        (addr.recipient(), seen)
    }

    fn test_order(order_id: u64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            order_id,
            order_number: format!("ORD2025010100000{order_id:04}"),
            customer_id: "client1".to_string(),
            status,
            items: vec![OrderItem {
                name: "Masala Dosa".to_string(),
                unit_price: Decimal::new(18000, 2),
                quantity: 2,
            }],
            subtotal: Decimal::new(36000, 2),
            delivery_fee: Decimal::new(2440, 2),
            total: Decimal::new(38440, 2),
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

    async fn on_duty_worker(storage: &Addr<Storage>, worker_id: &str) {
        storage
            .send(RegisterWorker {
                worker_id: worker_id.to_string(),
            })
            .await
            .unwrap();
        storage
            .send(SetWorkerDuty {
                worker_id: worker_id.to_string(),
                on_duty: true,
            })
            .await
            .unwrap()
            .unwrap();
    }

    #[actix_rt::test]
    async fn ready_order_is_offered_to_every_available_worker() {
        let storage = Storage::new().start();
        let (notifier, seen) = probe();
        let coordinator = AssignmentCoordinator::new(storage.clone(), notifier).start();

        storage
            .send(AddOrder {
                order: test_order(1, OrderStatus::Ready),
            })
            .await
            .unwrap();
        on_duty_worker(&storage, "rider1").await;
        on_duty_worker(&storage, "rider2").await;

        coordinator.send(OrderReady { order_id: 1 }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let seen = seen.lock();
        let mut recipients: Vec<&str> = seen.iter().map(|n| n.recipient.as_str()).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["rider1", "rider2"]);
        assert!(seen.iter().all(|n| n.title == "New order available"));
    }

    #[actix_rt::test]
    async fn an_already_assigned_order_is_not_offered_again() {
        let storage = Storage::new().start();
        let (notifier, seen) = probe();
        let coordinator = AssignmentCoordinator::new(storage.clone(), notifier).start();

        storage
            .send(AddOrder {
                order: test_order(1, OrderStatus::Ready),
            })
            .await
            .unwrap();
        on_duty_worker(&storage, "rider1").await;
        on_duty_worker(&storage, "rider2").await;
        coordinator
            .send(ClaimOrder {
                order_id: 1,
                worker_id: "rider1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        seen.lock().clear();

        coordinator.send(OrderReady { order_id: 1 }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(seen.lock().is_empty());
    }

    #[actix_rt::test]
    async fn claim_assigns_and_tells_the_customer() {
        let storage = Storage::new().start();
        let (notifier, seen) = probe();
        let coordinator = AssignmentCoordinator::new(storage.clone(), notifier).start();

        storage
            .send(AddOrder {
                order: test_order(1, OrderStatus::Ready),
            })
            .await
            .unwrap();
        on_duty_worker(&storage, "rider1").await;

        let order = coordinator
            .send(ClaimOrder {
                order_id: 1,
                worker_id: "rider1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, OrderStatus::OutForDelivery);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let seen = seen.lock();
        assert!(seen
            .iter()
            .any(|n| n.recipient == "client1" && n.title == "Order out for delivery"));
    }

    #[actix_rt::test]
    async fn losing_claim_surfaces_the_storage_decision() {
        let storage = Storage::new().start();
        let (notifier, _seen) = probe();
        let coordinator = AssignmentCoordinator::new(storage.clone(), notifier).start();

        storage
            .send(AddOrder {
                order: test_order(1, OrderStatus::Ready),
            })
            .await
            .unwrap();
        on_duty_worker(&storage, "rider1").await;
        on_duty_worker(&storage, "rider2").await;

        coordinator
            .send(ClaimOrder {
                order_id: 1,
                worker_id: "rider1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        let err = coordinator
            .send(ClaimOrder {
                order_id: 1,
                worker_id: "rider2".to_string(),
            })
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Flow(OrderFlowError::AlreadyAssigned)
        ));
    }

    #[actix_rt::test]
    async fn delivery_frees_the_worker_and_notifies_both_sides() {
        let storage = Storage::new().start();
        let (notifier, seen) = probe();
        let coordinator = AssignmentCoordinator::new(storage.clone(), notifier).start();

        storage
            .send(AddOrder {
                order: test_order(1, OrderStatus::Ready),
            })
            .await
            .unwrap();
        on_duty_worker(&storage, "rider1").await;
        coordinator
            .send(ClaimOrder {
                order_id: 1,
                worker_id: "rider1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        storage
            .send(TransitionOrder {
                order_id: 1,
                target: OrderStatus::Delivered,
            })
            .await
            .unwrap()
            .unwrap();
        seen.lock().clear();

        coordinator
            .send(OrderDelivered { order_id: 1 })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let worker = storage
            .send(GetWorker {
                worker_id: "rider1".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert!(worker.is_available);

        let seen = seen.lock();
        assert!(seen
            .iter()
            .any(|n| n.recipient == "client1" && n.title == "Order delivered"));
        assert!(seen.iter().any(|n| n.recipient == ADMIN_RECIPIENT));
    }
}
