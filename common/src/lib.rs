pub mod bimap;
pub mod constants;
pub mod errors;
pub mod logger;
pub mod types;
pub mod utils;
