pub mod code_store;
pub mod coordinator;
pub mod notifier;
pub mod services;
pub mod storage;
