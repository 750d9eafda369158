//! Library exports for turnpass, shared between the binary and tests.

pub mod config;
pub mod gateway;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod upstream;
pub mod utils;
