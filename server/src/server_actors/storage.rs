use crate::ledger;
use crate::messages::internal_messages::{
    AddOrder, AssignOrder, GetOrder, GetWorker, ListAvailableWorkers, RegisterWorker,
    ReleaseWorker, SetWorkerDuty, SetWorkerPosition, TransitionOrder,
};
use actix::prelude::*;
use chrono::Utc;
use colored::Color;
use common::bimap::BiMap;
use common::errors::OrderFlowError;
use common::logger::Logger;
use common::types::order::OrderRecord;
use common::types::order_status::OrderStatus;
use common::types::worker::WorkerRecord;
use std::collections::HashMap;

/// The `Storage` actor owns all mutable state of the engine: the order
/// ledger, the worker registry and the active assignment table.
///
/// Every mutation goes through its mailbox, so compound operations such as
/// [`AssignOrder`] are atomic without locks: two workers racing for the same
/// order are processed one after the other, and the second one sees the
/// binding the first one made.
pub struct Storage {
    /// Orders by id.
    pub orders: HashMap<u64, OrderRecord>,
    /// Delivery workers by id.
    pub workers: HashMap<String, WorkerRecord>,
    /// Orders currently out with a worker. One order per worker and one
    /// worker per order, in both directions.
    pub active_assignments: BiMap<u64, String>,
    /// Logger for storage events.
    pub logger: Logger,
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            workers: HashMap::new(),
            active_assignments: BiMap::new(),
            logger: Logger::new("Storage", Color::White),
        }
    }

    /// Binds `worker_id` to `order_id` exclusively. Checks are ordered so the
    /// caller learns the most specific reason a claim failed.
    fn try_assign(
        &mut self,
        order_id: u64,
        worker_id: &str,
    ) -> Result<OrderRecord, OrderFlowError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if order.worker_id.is_some() {
            return Err(OrderFlowError::AlreadyAssigned);
        }
        if !order.status.is_assignable() {
            return Err(OrderFlowError::InvalidState {
                status: order.status,
            });
        }
        let worker = self
            .workers
            .get(worker_id)
            .ok_or_else(|| OrderFlowError::WorkerNotFound(worker_id.to_string()))?;
        if !worker.can_take_order() {
            return Err(OrderFlowError::WorkerUnavailable);
        }
        if self.active_assignments.contains_value(&worker_id.to_string()) {
            return Err(OrderFlowError::WorkerBusy);
        }

        let now = Utc::now();
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(OrderFlowError::OrderNotFound(order_id))?;
        // An order offered while still Preparing passes through Ready so the
        // transition graph stays closed and ready_at gets stamped.
        if order.status == OrderStatus::Preparing {
            ledger::apply_transition(order, OrderStatus::Ready, now)?;
        }
        ledger::apply_transition(order, OrderStatus::OutForDelivery, now)?;
        order.worker_id = Some(worker_id.to_string());

        if let Some(worker) = self.workers.get_mut(worker_id) {
            worker.is_available = false;
            worker.last_seen = now;
        }
        self.active_assignments
            .insert(order_id, worker_id.to_string());

        self.logger.info(format!(
            "Order {} assigned to worker {}",
            order.order_number, worker_id
        ));
        Ok(order.clone())
    }

    /// Drops the active assignment for `order_id`, if any. The worker becomes
    /// available again only while on duty and carrying no other order.
    fn unbind(&mut self, order_id: u64) {
        let Some(worker_id) = self.active_assignments.remove_by_key(&order_id) else {
            return;
        };
        if let Some(worker) = self.workers.get_mut(&worker_id) {
            let still_busy = self.active_assignments.contains_value(&worker_id);
            if worker.is_on_duty && !still_busy {
                worker.is_available = true;
            }
            worker.last_seen = Utc::now();
        }
        self.logger
            .info(format!("Worker {worker_id} released from order {order_id}"));
    }

    /// Releases the worker of a finished order. A worker stays bound while
    /// their order is still in flight, so a premature release is refused
    /// rather than letting the same worker pick up a second order.
    /// Releasing an unassigned or already released order is a no-op.
    fn release(&mut self, order_id: u64) -> Result<(), OrderFlowError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if !order.status.is_terminal() && self.active_assignments.contains_key(&order_id) {
            return Err(OrderFlowError::InvalidState {
                status: order.status,
            });
        }
        self.unbind(order_id);
        Ok(())
    }
}

impl Actor for Storage {
    type Context = Context<Self>;
}

impl Handler<AddOrder> for Storage {
    type Result = ();

    fn handle(&mut self, msg: AddOrder, _ctx: &mut Self::Context) -> Self::Result {
        self.logger.info(format!(
            "Order {} stored for client {}",
            msg.order.order_number, msg.order.customer_id
        ));
        self.orders.insert(msg.order.order_id, msg.order);
    }
}

impl Handler<GetOrder> for Storage {
    type Result = MessageResult<GetOrder>;

    fn handle(&mut self, msg: GetOrder, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.orders.get(&msg.order_id).cloned())
    }
}

impl Handler<TransitionOrder> for Storage {
    type Result = MessageResult<TransitionOrder>;

    fn handle(&mut self, msg: TransitionOrder, _ctx: &mut Self::Context) -> Self::Result {
        let Some(order) = self.orders.get_mut(&msg.order_id) else {
            return MessageResult(Err(OrderFlowError::OrderNotFound(msg.order_id)));
        };
        match ledger::apply_transition(order, msg.target, Utc::now()) {
            Ok(()) => {
                // A cancelled order keeps no worker: the binding is voided
                // here, in the same handler, so the worker never stays stuck
                // on a dead order.
                if order.status == OrderStatus::Cancelled {
                    order.worker_id = None;
                }
                let record = order.clone();
                self.logger.info(format!(
                    "Order {} is now {}",
                    record.order_number, record.status
                ));
                if record.status == OrderStatus::Cancelled {
                    self.unbind(record.order_id);
                }
                MessageResult(Ok(record))
            }
            Err(err) => {
                self.logger.warn(format!(
                    "Rejected transition for order {}: {err}",
                    msg.order_id
                ));
                MessageResult(Err(err))
            }
        }
    }
}

impl Handler<RegisterWorker> for Storage {
    type Result = ();

    fn handle(&mut self, msg: RegisterWorker, _ctx: &mut Self::Context) -> Self::Result {
        // Re-registering keeps the existing record so duty state survives a
        // worker reconnect.
        if !self.workers.contains_key(&msg.worker_id) {
            self.logger
                .info(format!("Worker {} registered", msg.worker_id));
            self.workers
                .insert(msg.worker_id.clone(), WorkerRecord::new(msg.worker_id));
        }
    }
}

impl Handler<GetWorker> for Storage {
    type Result = MessageResult<GetWorker>;

    fn handle(&mut self, msg: GetWorker, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.workers.get(&msg.worker_id).cloned())
    }
}

impl Handler<SetWorkerDuty> for Storage {
    type Result = MessageResult<SetWorkerDuty>;

    fn handle(&mut self, msg: SetWorkerDuty, _ctx: &mut Self::Context) -> Self::Result {
        let Some(worker) = self.workers.get_mut(&msg.worker_id) else {
            return MessageResult(Err(OrderFlowError::WorkerNotFound(msg.worker_id)));
        };
        worker.is_on_duty = msg.on_duty;
        // Going off duty hides the worker from offers; coming back on duty
        // restores availability unless an active delivery is still open.
        worker.is_available =
            msg.on_duty && !self.active_assignments.contains_value(&msg.worker_id);
        worker.last_seen = Utc::now();
        self.logger.info(format!(
            "Worker {} is now {}",
            msg.worker_id,
            if msg.on_duty { "on duty" } else { "off duty" }
        ));
        MessageResult(Ok(worker.clone()))
    }
}

impl Handler<SetWorkerPosition> for Storage {
    type Result = MessageResult<SetWorkerPosition>;

    fn handle(&mut self, msg: SetWorkerPosition, _ctx: &mut Self::Context) -> Self::Result {
        let Some(worker) = self.workers.get_mut(&msg.worker_id) else {
            return MessageResult(Err(OrderFlowError::WorkerNotFound(msg.worker_id)));
        };
        worker.position = Some(msg.position);
        worker.last_seen = Utc::now();
        MessageResult(Ok(worker.clone()))
    }
}

impl Handler<ListAvailableWorkers> for Storage {
    type Result = MessageResult<ListAvailableWorkers>;

    fn handle(&mut self, _msg: ListAvailableWorkers, _ctx: &mut Self::Context) -> Self::Result {
        let mut ids: Vec<String> = self
            .workers
            .values()
            .filter(|w| w.can_take_order())
            .map(|w| w.worker_id.clone())
            .collect();
        ids.sort();
        MessageResult(ids)
    }
}

impl Handler<AssignOrder> for Storage {
    type Result = MessageResult<AssignOrder>;

    fn handle(&mut self, msg: AssignOrder, _ctx: &mut Self::Context) -> Self::Result {
        let result = self.try_assign(msg.order_id, &msg.worker_id);
        if let Err(err) = &result {
            self.logger.warn(format!(
                "Worker {} could not take order {}: {err}",
                msg.worker_id, msg.order_id
            ));
        }
        MessageResult(result)
    }
}

impl Handler<ReleaseWorker> for Storage {
    type Result = MessageResult<ReleaseWorker>;

    fn handle(&mut self, msg: ReleaseWorker, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.release(msg.order_id))
    }
}
