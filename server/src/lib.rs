pub mod config;
pub mod geo;
pub mod ledger;
pub mod messages;
pub mod server_actors;
