use actix::prelude::*;
use colored::Color;
use common::constants::{CODE_SWEEP_INTERVAL, CODE_TTL};
use common::logger::Logger;
use common::types::order::OrderItem;
use common::types::order_status::OrderStatus;
use rust_decimal::Decimal;
use server::config::{shared_geo_config, GeoConfig, OrderPolicy};
use server::geo::GeoFeeCalculator;
use server::messages::internal_messages::{
    ClaimOrder, IssueCode, PlaceOrder, RegisterWorker, SetWorkerDuty, SetWorkerPosition,
    UpdateOrderStatus, VerifyCode,
};
use server::server_actors::code_store::CodeStore;
use server::server_actors::coordinator::AssignmentCoordinator;
use server::server_actors::notifier::Notifier;
use server::server_actors::services::order_service::OrderService;
use server::server_actors::storage::Storage;

/// Walks one order through the whole engine: placement, kitchen milestones,
/// a worker claiming the delivery, code verification at the door, release.
#[actix::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Logger::new("Demo", Color::Blue);

    let notifier = Notifier::new().start().recipient();
    let storage = Storage::new().start();
    let coordinator = AssignmentCoordinator::new(storage.clone(), notifier.clone()).start();
    let geo = GeoFeeCalculator::new(shared_geo_config(GeoConfig::default()));
    let code_store = CodeStore::new(CODE_SWEEP_INTERVAL).start();
    let order_service = OrderService::new(
        storage.clone(),
        coordinator.clone(),
        notifier,
        geo,
        OrderPolicy::default(),
    )
    .start();

    storage
        .send(RegisterWorker {
            worker_id: "rider1".to_string(),
        })
        .await?;
    if let Err(err) = storage
        .send(SetWorkerDuty {
            worker_id: "rider1".to_string(),
            on_duty: true,
        })
        .await?
    {
        logger.error(format!("Could not put rider1 on duty: {err}"));
        return Ok(());
    }
    if let Err(err) = storage
        .send(SetWorkerPosition {
            worker_id: "rider1".to_string(),
            position: (28.6150, 77.2100),
        })
        .await?
    {
        logger.error(format!("Could not position rider1: {err}"));
    }

    let order = match order_service
        .send(PlaceOrder {
            customer_id: "client1".to_string(),
            items: vec![
                OrderItem {
                    name: "Paneer Tikka".to_string(),
                    unit_price: Decimal::new(25000, 2),
                    quantity: 1,
                },
                OrderItem {
                    name: "Garlic Naan".to_string(),
                    unit_price: Decimal::new(6000, 2),
                    quantity: 2,
                },
            ],
            delivery_position: (28.6200, 77.2150),
            delivery_address: "42 Main Street".to_string(),
        })
        .await?
    {
        Ok(order) => order,
        Err(err) => {
            logger.error(format!("Order rejected: {err}"));
            return Ok(());
        }
    };
    logger.info(format!(
        "Placed order {} totalling {}",
        order.order_number, order.total
    ));

    for target in [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        if let Err(err) = order_service
            .send(UpdateOrderStatus {
                order_id: order.order_id,
                target,
            })
            .await?
        {
            logger.error(format!("Kitchen update failed: {err}"));
            return Ok(());
        }
    }

    let claimed = match coordinator
        .send(ClaimOrder {
            order_id: order.order_id,
            worker_id: "rider1".to_string(),
        })
        .await?
    {
        Ok(order) => order,
        Err(err) => {
            logger.error(format!("Claim failed: {err}"));
            return Ok(());
        }
    };
    logger.info(format!(
        "Order {} picked up by {}",
        claimed.order_number,
        claimed.worker_id.as_deref().unwrap_or("unknown")
    ));

    // Door-step verification: the customer reads the code to the worker.
    let code = code_store
        .send(IssueCode {
            subject: claimed.order_number.clone(),
            ttl: CODE_TTL,
        })
        .await?;
    match code_store
        .send(VerifyCode {
            subject: claimed.order_number.clone(),
            code,
        })
        .await?
    {
        Ok(()) => logger.info("Delivery code verified".to_string()),
        Err(err) => {
            logger.error(format!("Delivery code rejected: {err}"));
            return Ok(());
        }
    }

    if let Err(err) = order_service
        .send(UpdateOrderStatus {
            order_id: order.order_id,
            target: OrderStatus::Delivered,
        })
        .await?
    {
        logger.error(format!("Could not mark order delivered: {err}"));
        return Ok(());
    }
    logger.info(format!("Order {} delivered", order.order_number));

    // Give fire-and-forget notifications a beat before shutting down.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    Ok(())
}
