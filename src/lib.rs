pub mod cli;
pub mod config;
pub mod cycle;
pub mod director;
pub mod discovery;
pub mod error;
pub mod filters;
pub mod k8s;
pub mod metrics;

#[cfg(test)]
mod testing;

pub use error::{Result, SdError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
