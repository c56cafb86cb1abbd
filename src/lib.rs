pub mod calculator;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod types;

pub use error::{PropperError, Result};
pub use types::{Column, PropertyRecord};
