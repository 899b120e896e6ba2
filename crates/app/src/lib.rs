//! Storefront application services: persistence, address lookup, simulated
//! checkout and support latency, configuration and logging.

pub mod address;
pub mod checkout;
pub mod config;
pub mod observability;
pub mod storage;
pub mod storefront;
pub mod support;
