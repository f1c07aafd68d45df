use crate::messages::internal_messages::Notify;
use actix::prelude::*;
use colored::Color;
use common::logger::Logger;

/// Best-effort notification sink.
///
/// Delivery failures must never block or fail an order operation, so every
/// notification arrives here as a fire-and-forget message and is only
/// logged. A push or mail gateway would slot in behind this actor.
pub struct Notifier {
    logger: Logger,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            logger: Logger::new("Notifier", Color::Cyan),
        }
    }
}

impl Actor for Notifier {
    type Context = Context<Self>;
}

impl Handler<Notify> for Notifier {
    type Result = ();

    fn handle(&mut self, msg: Notify, _ctx: &mut Self::Context) -> Self::Result {
        self.logger.info(format!(
            "to {}: {} | {}",
            msg.recipient, msg.title, msg.body
        ));
    }
}
